use crate::{
    chart::node::{Datum, Node, NodeKind},
    chart::surface::Tooltip,
    data::fear::{FearLabel, Supergroup},
    foundation::math::format_thousands,
    router::state::BarsDataset,
};

/// Tooltip for a scatter mark.
pub fn scatter_tooltip(label: &str, count: u32, quality: f64, reach: f64) -> Tooltip {
    Tooltip {
        title: label.to_string(),
        lines: vec![
            format!("Titles: {}", format_thousands(f64::from(count))),
            format!("Average rating: {quality:.2}"),
            format!("Total votes: {}", format_thousands(reach)),
        ],
    }
}

/// Tooltip for a bar. Flat bars explain the label; grouped bars list their members.
pub fn bar_tooltip(label: &str, count: u32, dataset: BarsDataset) -> Tooltip {
    let mut lines = vec![format!("Synopses: {count}")];
    match dataset {
        BarsDataset::Flat => {
            if let Some(l) = FearLabel::parse(label) {
                lines.push(l.description().to_string());
            }
        }
        BarsDataset::Grouped => {
            if let Some(g) = Supergroup::parse(label) {
                let members: Vec<&str> = g.members().into_iter().map(FearLabel::name).collect();
                lines.push(format!("Includes: {}", members.join(", ")));
            }
        }
    }
    Tooltip {
        title: label.to_string(),
        lines,
    }
}

/// Tooltip for `node` when it is a hoverable mark of the kind currently shown.
///
/// `bars` is the dataset of the rendered bar chart, `None` while the scatter is shown.
pub(crate) fn tooltip_for(node: &Node, bars: Option<BarsDataset>) -> Option<Tooltip> {
    if !node.interactive() {
        return None;
    }
    match (node.kind, node.datum?, bars) {
        (
            NodeKind::Dot | NodeKind::DotLabel,
            Datum::Category {
                count,
                quality,
                reach,
            },
            None,
        ) => Some(scatter_tooltip(&node.key, count, quality, reach)),
        (NodeKind::Bar | NodeKind::BarLabel, Datum::Fear { count }, Some(dataset)) => {
            Some(bar_tooltip(&node.key, count, dataset))
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/tooltip.rs"]
mod tests;
