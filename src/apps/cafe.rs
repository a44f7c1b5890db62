use std::collections::HashMap;
use std::sync::Arc;

use crate::apps::{LaunchError, decode_all, format_price};
use crate::client::{ClientResult, HttpResourceClient, SharedClient};
use crate::config::AppsConfig;
use crate::controller::ListController;
use crate::models::{Drink, Shop};
use crate::navigation::NavStack;
use crate::scope::ScreenScope;
use crate::store::ChangeBus;

pub const DELIVERY_FEE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub enum CafeScreen {
    Welcome,
    Shops,
    Drinks { shop: Shop },
    Orders { shop: Shop },
}

/// Drinks of one shop, with quantities kept on this screen only.
pub struct DrinksController {
    shop: Shop,
    list: ListController,
    quantities: HashMap<String, u32>,
}

impl DrinksController {
    pub fn new(shop: Shop, client: SharedClient, bus: &ChangeBus, scope: ScreenScope) -> Self {
        Self {
            shop,
            list: ListController::new(client, "name", bus, scope),
            quantities: HashMap::new(),
        }
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn list(&self) -> &ListController {
        &self.list
    }

    pub async fn load(&mut self) {
        self.list.refresh().await;
    }

    pub fn drinks(&self) -> Vec<Drink> {
        decode_all(self.list.visible())
    }

    pub fn quantity(&self, drink_id: &str) -> u32 {
        self.quantities.get(drink_id).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, drink_id: &str) -> u32 {
        let quantity = self.quantities.entry(drink_id.to_string()).or_insert(0);
        *quantity += 1;
        *quantity
    }

    pub fn decrement(&mut self, drink_id: &str) -> u32 {
        match self.quantities.get_mut(drink_id) {
            Some(quantity) if *quantity > 1 => {
                *quantity -= 1;
                *quantity
            }
            Some(_) => {
                self.quantities.remove(drink_id);
                0
            }
            None => 0,
        }
    }

    /// Drinks with a quantity, in list order.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.drinks()
            .into_iter()
            .filter_map(|drink| {
                let quantity = self.quantity(&drink.id);
                (quantity > 0).then_some(OrderLine { drink, quantity })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub drink: Drink,
    pub quantity: u32,
}

impl OrderLine {
    pub fn total(&self) -> f64 {
        self.drink.price * f64::from(self.quantity)
    }

    pub fn total_label(&self) -> String {
        format_price(self.total())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Delivery,
    Cafe,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub kind: SummaryKind,
    pub label: &'static str,
    pub amount: f64,
}

impl OrderSummary {
    pub fn amount_label(&self) -> String {
        format_price(self.amount)
    }
}

/// "Your orders" screen. Nothing here is sent to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSheet {
    shop: Shop,
    lines: Vec<OrderLine>,
}

impl OrderSheet {
    pub fn new(shop: Shop, lines: Vec<OrderLine>) -> Self {
        Self { shop, lines }
    }

    pub fn title(&self) -> String {
        format!("Your orders - {}", self.shop.name)
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn increment(&mut self, drink_id: &str) -> Option<u32> {
        let line = self.lines.iter_mut().find(|l| l.drink.id == drink_id)?;
        line.quantity += 1;
        Some(line.quantity)
    }

    /// Floors at one; lines are not removed from this screen.
    pub fn decrement(&mut self, drink_id: &str) -> Option<u32> {
        let line = self.lines.iter_mut().find(|l| l.drink.id == drink_id)?;
        line.quantity = line.quantity.saturating_sub(1).max(1);
        Some(line.quantity)
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(OrderLine::total).sum()
    }

    pub fn summaries(&self) -> [OrderSummary; 2] {
        [
            OrderSummary {
                kind: SummaryKind::Delivery,
                label: "CAFE DELIVERY",
                amount: DELIVERY_FEE,
            },
            OrderSummary {
                kind: SummaryKind::Cafe,
                label: "CAFE",
                amount: self.subtotal(),
            },
        ]
    }

    pub fn total(&self) -> f64 {
        DELIVERY_FEE + self.subtotal()
    }

    pub fn total_label(&self) -> String {
        format_price(self.total())
    }
}

/// Welcome -> Shops -> Drinks -> Orders.
pub struct CafeApp {
    shops_client: SharedClient,
    drinks_client: SharedClient,
    bus: ChangeBus,
    nav: NavStack<CafeScreen>,
    shops: Option<ListController>,
    drinks: Option<DrinksController>,
    orders: Option<OrderSheet>,
}

impl CafeApp {
    pub fn new(shops_client: SharedClient, drinks_client: SharedClient) -> Self {
        Self {
            shops_client,
            drinks_client,
            bus: ChangeBus::default(),
            nav: NavStack::new(CafeScreen::Welcome),
            shops: None,
            drinks: None,
            orders: None,
        }
    }

    pub fn from_config(config: &AppsConfig) -> ClientResult<Self> {
        let shops = HttpResourceClient::new(config.shops.clone())?;
        let drinks = HttpResourceClient::new(config.drinks.clone())?;
        Ok(Self::new(Arc::new(shops), Arc::new(drinks)))
    }

    pub fn from_env() -> Result<Self, LaunchError> {
        Ok(Self::from_config(&AppsConfig::load()?)?)
    }

    pub fn screen(&self) -> &CafeScreen {
        self.nav.current()
    }

    pub async fn get_started(&mut self) {
        if *self.nav.current() != CafeScreen::Welcome {
            return;
        }
        let scope = self.nav.push(CafeScreen::Shops);
        let mut shops = ListController::new(self.shops_client.clone(), "name", &self.bus, scope);
        shops.refresh().await;
        self.shops = Some(shops);
    }

    pub fn shops_list(&self) -> Option<&ListController> {
        self.shops.as_ref()
    }

    pub fn shops(&self) -> Vec<Shop> {
        match &self.shops {
            Some(list) => decode_all(list.visible()),
            None => Vec::new(),
        }
    }

    /// Opens a shop's drinks with fresh quantities.
    pub async fn open_shop(&mut self, id: &str) -> bool {
        if *self.nav.current() != CafeScreen::Shops {
            return false;
        }
        let Some(shop) = self.shops().into_iter().find(|s| s.id == id) else {
            return false;
        };

        let scope = self.nav.push(CafeScreen::Drinks { shop: shop.clone() });
        let mut drinks = DrinksController::new(shop, self.drinks_client.clone(), &self.bus, scope);
        drinks.load().await;
        self.drinks = Some(drinks);
        true
    }

    pub fn drinks(&self) -> Option<&DrinksController> {
        self.drinks.as_ref()
    }

    pub fn drinks_mut(&mut self) -> Option<&mut DrinksController> {
        self.drinks.as_mut()
    }

    pub fn go_to_cart(&mut self) -> bool {
        let Some(drinks) = self.drinks.as_ref() else {
            return false;
        };
        if !matches!(self.nav.current(), CafeScreen::Drinks { .. }) {
            return false;
        }

        let shop = drinks.shop().clone();
        let sheet = OrderSheet::new(shop.clone(), drinks.order_lines());
        self.nav.push(CafeScreen::Orders { shop });
        self.orders = Some(sheet);
        true
    }

    pub fn orders(&self) -> Option<&OrderSheet> {
        self.orders.as_ref()
    }

    pub fn orders_mut(&mut self) -> Option<&mut OrderSheet> {
        self.orders.as_mut()
    }

    pub fn go_back(&mut self) {
        match self.nav.pop() {
            Some(CafeScreen::Orders { .. }) => self.orders = None,
            Some(CafeScreen::Drinks { .. }) => self.drinks = None,
            Some(CafeScreen::Shops) => self.shops = None,
            Some(CafeScreen::Welcome) | None => {}
        }
    }
}
