use crate::foundation::core::Rgba8;

/// Sequential ramp for the six count buckets (lightest = rarest).
pub const BUCKET_COLORS: [Rgba8; 6] = [
    Rgba8::rgb(0xfe, 0xe5, 0xd9),
    Rgba8::rgb(0xfc, 0xbb, 0xa1),
    Rgba8::rgb(0xfc, 0x92, 0x72),
    Rgba8::rgb(0xfb, 0x6a, 0x4a),
    Rgba8::rgb(0xde, 0x2d, 0x26),
    Rgba8::rgb(0xa5, 0x0f, 0x15),
];

/// Bar fill.
pub const BAR_COLOR: Rgba8 = Rgba8::rgb(0x8b, 0x1e, 0x2d);

/// Fill of the zoomed mark.
pub const ZOOM_COLOR: Rgba8 = Rgba8::rgb(0x5c, 0x00, 0x0a);

/// Text, axes, and guides.
pub const INK: Rgba8 = Rgba8::rgb(0x22, 0x22, 0x22);

/// Quadrant guide lines.
pub const GUIDE_COLOR: Rgba8 = Rgba8::rgb(0x88, 0x88, 0x88);
