//! Express - order and pay at the counter
//!
//! No tables and no send button: payment triggers the send.

use super::{
    LayoutProps, Panel, RenderLayout, Screen, banner, category_rail, item_grid, pay_button,
    search_keyboard, ticket, totals,
};
use crate::session::PaymentMethod;
use crate::theme::PosTheme;

const GRID_COLUMNS: u8 = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressLayout;

impl RenderLayout for ExpressLayout {
    fn theme(&self) -> PosTheme {
        PosTheme::Express
    }

    fn render(&self, props: &LayoutProps<'_>) -> Screen {
        let mut panels: Vec<Panel> = banner(props).into_iter().collect();
        panels.push(category_rail(props));
        panels.extend(search_keyboard(props));
        panels.push(item_grid(props, GRID_COLUMNS));
        panels.push(ticket(props));
        panels.push(totals(props));
        panels.push(Panel::ActionBar {
            buttons: vec![
                pay_button(props, "Cash", PaymentMethod::Cash),
                pay_button(props, "Card", PaymentMethod::Card),
            ],
        });

        Screen {
            theme: PosTheme::Express,
            panels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::Fixture;

    #[test]
    fn test_express_has_no_tables_or_send() {
        let fixture = Fixture::new();
        let screen = ExpressLayout.render(&fixture.props());
        assert!(screen.panel(|p| matches!(p, Panel::TableStrip { .. })).is_none());
        assert!(screen.button("Send").is_none());
        assert!(screen.button("Cash").is_some_and(|b| b.enabled));
        assert!(
            screen
                .panel(|p| matches!(p, Panel::ItemGrid { columns: 3, .. }))
                .is_some()
        );
    }

    #[test]
    fn test_pay_disabled_on_empty_ticket() {
        let mut fixture = Fixture::new();
        fixture.lines.clear();
        let screen = ExpressLayout.render(&fixture.props());
        assert!(screen.buttons().all(|b| !b.enabled));
    }
}
