//! Layout renderers
//!
//! Every theme receives the same [`LayoutProps`] and produces a [`Screen`]:
//! a structured description of the panels a host UI paints. Renderers are
//! pure; the only state they see besides the props is [`LayoutUiState`].

use crate::session::PaymentMethod;
use crate::theme::PosTheme;
use enum_dispatch::enum_dispatch;
use serde::Serialize;
use shared::OrderTotals;
use shared::models::{CurrentOrder, DiningTable, MenuCategory, MenuItem, OrderLine, TableStatus, Venue};
use shared::money::format_amount;

mod express;
mod pro;
mod restin;

pub use express::ExpressLayout;
pub use pro::ProLayout;
pub use restin::RestinLayout;

/// Everything a layout may display
#[derive(Debug, Clone, Copy)]
pub struct LayoutProps<'a> {
    pub venue: &'a Venue,
    pub categories: &'a [MenuCategory],
    pub items: &'a [MenuItem],
    pub tables: &'a [DiningTable],
    pub selected_table: Option<&'a DiningTable>,
    pub current_order: Option<&'a CurrentOrder>,
    pub lines: &'a [OrderLine],
    pub totals: OrderTotals,
    /// A send or payment is in flight
    pub sending: bool,
    pub online: bool,
    pub ui: &'a LayoutUiState,
}

/// Local UI toggles, owned by the session and never sent anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutUiState {
    pub active_category: Option<String>,
    pub active_course: u32,
    pub active_seat: u32,
    pub keyboard_visible: bool,
    pub search: String,
}

impl Default for LayoutUiState {
    fn default() -> Self {
        Self {
            active_category: None,
            active_course: shared::models::DEFAULT_COURSE,
            active_seat: shared::models::DEFAULT_SEAT,
            keyboard_visible: false,
            search: String::new(),
        }
    }
}

/// User intent raised by a rendered control
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SelectTable { table_id: String },
    UseCounter,
    SelectCategory { category_id: Option<String> },
    AddItem { item_id: String },
    Increment { line: usize },
    Decrement { line: usize },
    Remove { line: usize },
    SetCourse { course: u32 },
    SetSeat { seat: u32 },
    /// Move a pending line to the active seat
    AssignActiveSeat { line: usize },
    /// Move a pending line to the active course
    AssignActiveCourse { line: usize },
    ToggleKeyboard,
    Search { query: String },
    Send,
    Pay { method: PaymentMethod },
    SwitchTheme { theme: PosTheme },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    pub label: String,
    pub action: Action,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableTile {
    pub id: String,
    pub name: String,
    pub status: TableStatus,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTab {
    pub id: Option<String>,
    pub name: String,
    pub color: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTile {
    pub id: String,
    pub name: String,
    pub price: String,
    pub color: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketLine {
    pub index: usize,
    pub name: String,
    pub quantity: i32,
    pub total: String,
    pub seat: u32,
    pub course: u32,
    pub modifiers: Vec<String>,
    pub notes: Option<String>,
    /// Not yet sent
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum Panel {
    Banner { message: String },
    TableStrip { tables: Vec<TableTile> },
    CategoryRail { tabs: Vec<CategoryTab> },
    ItemGrid { columns: u8, items: Vec<ItemTile> },
    CourseTabs { courses: Vec<u32>, active: u32 },
    SeatTabs { seats: Vec<u32>, active: u32 },
    SearchKeyboard { query: String },
    Ticket { title: String, lines: Vec<TicketLine> },
    Totals { subtotal: String, tax: String, total: String },
    ActionBar { buttons: Vec<Button> },
}

/// Rendered layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    pub theme: PosTheme,
    pub panels: Vec<Panel>,
}

impl Screen {
    pub fn panel(&self, predicate: impl Fn(&Panel) -> bool) -> Option<&Panel> {
        self.panels.iter().find(|p| predicate(p))
    }

    /// Every button of the action bar
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.panels
            .iter()
            .filter_map(|p| match p {
                Panel::ActionBar { buttons } => Some(buttons),
                _ => None,
            })
            .flatten()
    }

    pub fn button(&self, label: &str) -> Option<&Button> {
        self.buttons().find(|b| b.label == label)
    }
}

/// One presentation strategy
#[enum_dispatch]
pub trait RenderLayout {
    fn theme(&self) -> PosTheme;
    fn render(&self, props: &LayoutProps<'_>) -> Screen;
}

/// Theme → renderer; adding a theme is a compile error until it is mapped here
#[enum_dispatch(RenderLayout)]
#[derive(Debug, Clone, Copy)]
pub enum LayoutRenderer {
    Restin(RestinLayout),
    Pro(ProLayout),
    Express(ExpressLayout),
}

impl From<PosTheme> for LayoutRenderer {
    fn from(theme: PosTheme) -> Self {
        match theme {
            PosTheme::Restin => RestinLayout.into(),
            PosTheme::Pro => ProLayout.into(),
            PosTheme::Express => ExpressLayout.into(),
        }
    }
}

// =============================================================================
// Building blocks shared by the renderers
// =============================================================================

fn money(props: &LayoutProps<'_>, amount: shared::Decimal) -> String {
    format_amount(amount, &props.venue.currency)
}

/// Offline notice, when relevant
pub(crate) fn banner(props: &LayoutProps<'_>) -> Option<Panel> {
    (!props.online).then(|| Panel::Banner {
        message: "Offline: orders cannot be sent".to_string(),
    })
}

pub(crate) fn table_strip(props: &LayoutProps<'_>) -> Panel {
    let selected = props.selected_table.map(|t| t.id.as_str());
    Panel::TableStrip {
        tables: props
            .tables
            .iter()
            .map(|t| TableTile {
                id: t.id.clone(),
                name: t.name.clone(),
                status: t.status,
                selected: selected == Some(t.id.as_str()),
            })
            .collect(),
    }
}

pub(crate) fn category_rail(props: &LayoutProps<'_>) -> Panel {
    let active = props.ui.active_category.as_deref();
    let all = CategoryTab {
        id: None,
        name: "All".to_string(),
        color: None,
        active: active.is_none(),
    };
    let tabs = std::iter::once(all)
        .chain(props.categories.iter().map(|c| CategoryTab {
            id: Some(c.id.clone()),
            name: c.name.clone(),
            color: c.color.clone(),
            active: active == Some(c.id.as_str()),
        }))
        .collect();
    Panel::CategoryRail { tabs }
}

/// Items of the active category matching the search query
pub(crate) fn visible_items<'a>(props: &LayoutProps<'a>) -> impl Iterator<Item = &'a MenuItem> + use<'a> {
    let category = props.ui.active_category.clone();
    let query = props.ui.search.trim().to_lowercase();
    props.items.iter().filter(move |item| {
        let in_category = match &category {
            Some(id) => item.category_id.as_deref() == Some(id.as_str()),
            None => true,
        };
        in_category && (query.is_empty() || item.name.to_lowercase().contains(&query))
    })
}

pub(crate) fn item_grid(props: &LayoutProps<'_>, columns: u8) -> Panel {
    Panel::ItemGrid {
        columns,
        items: visible_items(props)
            .map(|item| ItemTile {
                id: item.id.clone(),
                name: item.name.clone(),
                price: money(props, item.price),
                color: item.color.clone(),
                image: item.image.clone(),
            })
            .collect(),
    }
}

pub(crate) fn course_tabs(props: &LayoutProps<'_>) -> Panel {
    let highest = props.lines.iter().map(|l| l.course).max().unwrap_or(1);
    Panel::CourseTabs {
        courses: (1..=highest.max(3)).collect(),
        active: props.ui.active_course,
    }
}

pub(crate) fn seat_tabs(props: &LayoutProps<'_>) -> Panel {
    let table_seats = props.selected_table.map(|t| t.seats).unwrap_or(1);
    let highest = props.lines.iter().map(|l| l.seat).max().unwrap_or(1);
    Panel::SeatTabs {
        seats: (1..=table_seats.max(highest).max(1)).collect(),
        active: props.ui.active_seat,
    }
}

pub(crate) fn search_keyboard(props: &LayoutProps<'_>) -> Option<Panel> {
    props.ui.keyboard_visible.then(|| Panel::SearchKeyboard {
        query: props.ui.search.clone(),
    })
}

pub(crate) fn ticket(props: &LayoutProps<'_>) -> Panel {
    let title = match (props.current_order, props.selected_table) {
        (Some(order), Some(table)) => format!("#{} · {}", order.order_number, table.name),
        (Some(order), None) => format!("#{}", order.order_number),
        (None, Some(table)) => format!("New order · {}", table.name),
        (None, None) => "New order".to_string(),
    };
    Panel::Ticket {
        title,
        lines: props
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| TicketLine {
                index,
                name: line.name.clone(),
                quantity: line.quantity,
                total: money(props, line.line_total()),
                seat: line.seat,
                course: line.course,
                modifiers: line.modifiers.iter().map(|m| m.name.clone()).collect(),
                notes: line.notes.clone(),
                pending: line.is_pending(),
            })
            .collect(),
    }
}

pub(crate) fn totals(props: &LayoutProps<'_>) -> Panel {
    Panel::Totals {
        subtotal: money(props, props.totals.subtotal),
        tax: money(props, props.totals.tax),
        total: money(props, props.totals.total),
    }
}

pub(crate) fn send_button(props: &LayoutProps<'_>) -> Button {
    Button {
        label: "Send".to_string(),
        action: Action::Send,
        enabled: !props.sending && props.online && props.lines.iter().any(OrderLine::is_pending),
    }
}

pub(crate) fn pay_button(props: &LayoutProps<'_>, label: &str, method: PaymentMethod) -> Button {
    Button {
        label: label.to_string(),
        action: Action::Pay { method },
        enabled: !props.sending && (!props.lines.is_empty() || props.current_order.is_some()),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::ServiceStyle;

    pub struct Fixture {
        pub venue: Venue,
        pub categories: Vec<MenuCategory>,
        pub items: Vec<MenuItem>,
        pub tables: Vec<DiningTable>,
        pub lines: Vec<OrderLine>,
        pub ui: LayoutUiState,
    }

    impl Fixture {
        pub fn new() -> Self {
            let item = |id: &str, category: &str, cents: i64| MenuItem {
                id: id.into(),
                name: id.to_string(),
                price: Decimal::new(cents, 2),
                category_id: Some(category.into()),
                image: None,
                color: None,
            };
            let mut pending = OrderLine::pending("margherita", "Margherita", Decimal::new(900, 2), vec![]);
            pending.quantity = 2;
            pending.recompute_total();

            Self {
                venue: Venue {
                    id: "v1".into(),
                    name: "Trattoria".into(),
                    currency: "EUR".into(),
                    service_style: ServiceStyle::TableService,
                    pos_theme: None,
                },
                categories: vec![
                    MenuCategory { id: "pizza".into(), name: "Pizza".into(), color: None, sort_order: 1 },
                    MenuCategory { id: "drinks".into(), name: "Drinks".into(), color: None, sort_order: 2 },
                ],
                items: vec![
                    item("Margherita", "pizza", 900),
                    item("Diavola", "pizza", 1100),
                    item("Coke", "drinks", 250),
                ],
                tables: vec![DiningTable {
                    id: "t1".into(),
                    name: "T1".into(),
                    seats: 4,
                    status: TableStatus::Available,
                    current_order_id: None,
                }],
                lines: vec![pending],
                ui: LayoutUiState::default(),
            }
        }

        pub fn props(&self) -> LayoutProps<'_> {
            LayoutProps {
                venue: &self.venue,
                categories: &self.categories,
                items: &self.items,
                tables: &self.tables,
                selected_table: self.tables.first(),
                current_order: None,
                lines: &self.lines,
                totals: shared::money::calculate_totals(&self.lines),
                sending: false,
                online: true,
                ui: &self.ui,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::Fixture;
    use super::*;

    #[test]
    fn test_every_theme_maps_to_its_renderer() {
        let fixture = Fixture::new();
        for theme in PosTheme::ALL {
            let renderer = LayoutRenderer::from(theme);
            assert_eq!(renderer.theme(), theme);
            assert_eq!(renderer.render(&fixture.props()).theme, theme);
        }
    }

    #[test]
    fn test_every_theme_shows_ticket_and_totals() {
        let fixture = Fixture::new();
        for theme in PosTheme::ALL {
            let screen = LayoutRenderer::from(theme).render(&fixture.props());
            let totals = screen.panel(|p| matches!(p, Panel::Totals { .. }));
            assert_eq!(
                totals,
                Some(&Panel::Totals {
                    subtotal: "18.00 EUR".into(),
                    tax: "3.24 EUR".into(),
                    total: "21.24 EUR".into(),
                })
            );
            assert!(screen.panel(|p| matches!(p, Panel::Ticket { .. })).is_some());
        }
    }

    #[test]
    fn test_search_and_category_filter() {
        let mut fixture = Fixture::new();
        fixture.ui.active_category = Some("pizza".into());
        assert_eq!(visible_items(&fixture.props()).count(), 2);

        fixture.ui.search = "DIAV".into();
        let names: Vec<&str> = visible_items(&fixture.props()).map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Diavola"]);

        fixture.ui.active_category = None;
        fixture.ui.search.clear();
        assert_eq!(visible_items(&fixture.props()).count(), 3);
    }

    #[test]
    fn test_send_disabled_while_sending_or_offline() {
        let fixture = Fixture::new();
        let mut props = fixture.props();
        assert!(send_button(&props).enabled);

        props.sending = true;
        assert!(!send_button(&props).enabled);

        props.sending = false;
        props.online = false;
        assert!(!send_button(&props).enabled);
        assert!(banner(&props).is_some());
    }
}
