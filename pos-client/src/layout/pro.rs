//! Pro - dense grid with search for desktop terminals

use super::{
    Action, Button, LayoutProps, Panel, RenderLayout, Screen, banner, category_rail, course_tabs,
    item_grid, pay_button, search_keyboard, send_button, table_strip, ticket, totals,
};
use crate::session::PaymentMethod;
use crate::theme::PosTheme;

const GRID_COLUMNS: u8 = 6;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProLayout;

impl RenderLayout for ProLayout {
    fn theme(&self) -> PosTheme {
        PosTheme::Pro
    }

    fn render(&self, props: &LayoutProps<'_>) -> Screen {
        let mut panels: Vec<Panel> = banner(props).into_iter().collect();
        panels.push(category_rail(props));
        panels.extend(search_keyboard(props));
        panels.push(item_grid(props, GRID_COLUMNS));
        panels.push(table_strip(props));
        panels.push(course_tabs(props));
        panels.push(ticket(props));
        panels.push(totals(props));
        panels.push(Panel::ActionBar {
            buttons: vec![
                Button {
                    label: "Search".to_string(),
                    action: Action::ToggleKeyboard,
                    enabled: true,
                },
                send_button(props),
                pay_button(props, "Card", PaymentMethod::Card),
                pay_button(props, "Cash", PaymentMethod::Cash),
            ],
        });

        Screen {
            theme: PosTheme::Pro,
            panels,
        }
    }
}
