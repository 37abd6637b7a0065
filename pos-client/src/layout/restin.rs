//! Restin - full-service table layout
//!
//! Table strip on top, course and seat tabs above the ticket so lines can be
//! routed per guest and per course before sending.

use super::{
    LayoutProps, Panel, RenderLayout, Screen, banner, category_rail, course_tabs,
    item_grid, pay_button, seat_tabs, send_button, table_strip, ticket, totals,
};
use crate::session::PaymentMethod;
use crate::theme::PosTheme;

const GRID_COLUMNS: u8 = 4;
const SPLIT_WAYS: u32 = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct RestinLayout;

impl RenderLayout for RestinLayout {
    fn theme(&self) -> PosTheme {
        PosTheme::Restin
    }

    fn render(&self, props: &LayoutProps<'_>) -> Screen {
        let mut panels: Vec<Panel> = banner(props).into_iter().collect();
        panels.push(table_strip(props));
        panels.push(category_rail(props));
        panels.push(item_grid(props, GRID_COLUMNS));
        panels.push(course_tabs(props));
        panels.push(seat_tabs(props));
        panels.push(ticket(props));
        panels.push(totals(props));

        let mut split = pay_button(props, "Split", PaymentMethod::Split { ways: SPLIT_WAYS });
        // Splitting a single cover makes no sense
        split.enabled &= props.selected_table.is_some_and(|t| t.seats > 1);

        panels.push(Panel::ActionBar {
            buttons: vec![
                send_button(props),
                pay_button(props, "Cash", PaymentMethod::Cash),
                pay_button(props, "Card", PaymentMethod::Card),
                split,
            ],
        });

        Screen {
            theme: PosTheme::Restin,
            panels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::Fixture;

    #[test]
    fn test_restin_panels() {
        let fixture = Fixture::new();
        let screen = RestinLayout.render(&fixture.props());

        assert!(matches!(screen.panels[0], Panel::TableStrip { .. }));
        assert!(
            screen
                .panel(|p| matches!(p, Panel::ItemGrid { columns: 4, .. }))
                .is_some()
        );
        assert_eq!(
            screen.panel(|p| matches!(p, Panel::SeatTabs { .. })),
            Some(&Panel::SeatTabs {
                seats: vec![1, 2, 3, 4],
                active: 1
            })
        );
        assert!(screen.panel(|p| matches!(p, Panel::SearchKeyboard { .. })).is_none());
        assert!(screen.button("Send").is_some_and(|b| b.enabled));
        assert!(screen.button("Split").is_some_and(|b| b.enabled));
    }
}
