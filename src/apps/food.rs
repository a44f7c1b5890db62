use std::sync::Arc;

use tracing::{error, info};

use crate::apps::{LaunchError, decode_all, format_price};
use crate::client::{ClientResult, HttpResourceClient, SharedClient};
use crate::config::AppsConfig;
use crate::controller::{ListController, ListState};
use crate::models::{CartLine, MenuItem, to_fields};
use crate::navigation::NavStack;
use crate::scope::ScreenScope;
use crate::store::ChangeBus;

pub const NAME_FIELD: &str = "name";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load donuts";
pub const ADD_FAILED_MESSAGE: &str = "Could not add to cart. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum FoodScreen {
    Catalog,
    Detail { item: MenuItem },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    Loading,
    Failed(&'static str),
    Ready(Vec<MenuItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartOutcome {
    Added(String),
    Failed(String),
    Dropped,
}

/// Detail screen: a local quantity and a write-only cart.
pub struct DetailController {
    item: MenuItem,
    quantity: u32,
    cart: SharedClient,
    scope: ScreenScope,
}

impl DetailController {
    pub fn new(item: MenuItem, cart: SharedClient, scope: ScreenScope) -> Self {
        Self {
            item,
            quantity: 1,
            cart,
            scope,
        }
    }

    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn price_label(&self) -> String {
        format_price(self.item.price)
    }

    pub fn increment(&mut self) -> u32 {
        self.quantity = self.quantity.saturating_add(1);
        self.quantity
    }

    pub fn decrement(&mut self) -> u32 {
        self.quantity = self.quantity.saturating_sub(1).max(1);
        self.quantity
    }

    pub async fn add_to_cart(&self) -> CartOutcome {
        let line = CartLine::for_item(&self.item, self.quantity);
        let fields = match to_fields(&line) {
            Ok(fields) => fields,
            Err(e) => {
                error!("Error building cart line: {}", e);
                return CartOutcome::Failed(ADD_FAILED_MESSAGE.to_string());
            }
        };

        match self.scope.run(self.cart.create(&fields)).await {
            Some(Ok(_)) => {
                info!("added {} x {} to cart", self.quantity, self.item.name);
                CartOutcome::Added(format!("Added {} {} to cart", self.quantity, self.item.name))
            }
            Some(Err(e)) => {
                error!("Error adding to cart: {}", e);
                CartOutcome::Failed(ADD_FAILED_MESSAGE.to_string())
            }
            None => CartOutcome::Dropped,
        }
    }
}

/// Catalog -> Detail.
pub struct FoodApp {
    cart: SharedClient,
    nav: NavStack<FoodScreen>,
    catalog: ListController,
    detail: Option<DetailController>,
}

impl FoodApp {
    pub fn new(items: SharedClient, cart: SharedClient) -> Self {
        let bus = ChangeBus::default();
        let nav = NavStack::new(FoodScreen::Catalog);
        let catalog = ListController::new(items, NAME_FIELD, &bus, nav.scope().clone());
        Self {
            cart,
            nav,
            catalog,
            detail: None,
        }
    }

    pub fn from_config(config: &AppsConfig) -> ClientResult<Self> {
        let items = HttpResourceClient::new(config.items.clone())?;
        let cart = HttpResourceClient::new(config.cart.clone())?;
        Ok(Self::new(Arc::new(items), Arc::new(cart)))
    }

    pub fn from_env() -> Result<Self, LaunchError> {
        Ok(Self::from_config(&AppsConfig::load()?)?)
    }

    pub fn screen(&self) -> &FoodScreen {
        self.nav.current()
    }

    pub async fn load(&mut self) {
        self.catalog.refresh().await;
    }

    pub fn search(&mut self, query: &str) {
        self.catalog.set_filter(query);
    }

    pub fn catalog(&self) -> CatalogView {
        match self.catalog.state() {
            ListState::Loading => CatalogView::Loading,
            ListState::Failed(_) => CatalogView::Failed(LOAD_FAILED_MESSAGE),
            ListState::Ready(_) => CatalogView::Ready(decode_all(self.catalog.visible())),
        }
    }

    pub fn open_detail(&mut self, id: &str) -> bool {
        if *self.nav.current() != FoodScreen::Catalog {
            return false;
        }
        let Some(record) = self.catalog.find(id).cloned() else {
            return false;
        };
        let item = match record.into_model::<MenuItem>() {
            Ok(item) => item,
            Err(e) => {
                error!("Failed to parse menu item {}: {}", id, e);
                return false;
            }
        };

        let scope = self.nav.push(FoodScreen::Detail { item: item.clone() });
        self.detail = Some(DetailController::new(item, self.cart.clone(), scope));
        true
    }

    pub fn detail(&self) -> Option<&DetailController> {
        self.detail.as_ref()
    }

    pub fn detail_mut(&mut self) -> Option<&mut DetailController> {
        self.detail.as_mut()
    }

    pub fn go_back(&mut self) {
        if let Some(FoodScreen::Detail { .. }) = self.nav.pop() {
            self.detail = None;
        }
    }
}
