//! Screen flow
//!
//! Tracks which screen is showing and hands state between them. The
//! checkout session is only ever created here, from a live selection; it is
//! never restored from storage, so after a reload the review and receipt
//! screens send the shopper back to browsing.

use crate::auth::AuthContext;
use crate::catalog::{CatalogPager, CatalogSource};
use crate::core::Config;
use crate::selection::SelectionAggregator;
use crate::session::{CheckoutSession, Handoff, PaymentOutcome, ReceiptSink, SessionError};
use crate::store::PersistedState;
use crate::wallet::WalletLedger;
use rust_decimal::Decimal;
use shared::LoginResponse;

/// Screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Browse,
    Review,
    Receipt,
}

impl Route {
    /// Requires a stored auth token
    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Requires an in-memory checkout session
    pub fn needs_session(self) -> bool {
        matches!(self, Route::Review | Route::Receipt)
    }
}

pub struct CheckoutFlow {
    auth: AuthContext,
    wallet: WalletLedger,
    selection: SelectionAggregator,
    pager: CatalogPager,
    session: Option<CheckoutSession>,
    route: Route,
}

impl CheckoutFlow {
    pub fn new(state: PersistedState, config: &Config) -> Self {
        let mut flow = Self {
            auth: AuthContext::new(state.clone()),
            wallet: WalletLedger::with_seed(state, config.wallet_seed),
            selection: SelectionAggregator::new(),
            pager: CatalogPager::new(config.page_size),
            session: None,
            route: Route::Login,
        };
        flow.route = flow.guard(Route::Browse);
        flow
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn wallet(&self) -> &WalletLedger {
        &self.wallet
    }

    pub fn wallet_balance(&self) -> Decimal {
        self.wallet.read_balance()
    }

    pub fn selection(&self) -> &SelectionAggregator {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionAggregator {
        &mut self.selection
    }

    pub fn pager(&self) -> &CatalogPager {
        &self.pager
    }

    pub fn pager_mut(&mut self) -> &mut CatalogPager {
        &mut self.pager
    }

    /// Where a request for `route` actually lands
    pub fn guard(&self, route: Route) -> Route {
        if route.is_protected() && !self.auth.is_authenticated() {
            return Route::Login;
        }
        if route.needs_session() && self.session.is_none() {
            return Route::Browse;
        }
        route
    }

    /// Go to `route` (subject to [`guard`](Self::guard))
    pub fn navigate(&mut self, route: Route) -> Route {
        let target = self.guard(route);
        if target != route {
            tracing::debug!(requested = ?route, redirected = ?target, "Route redirected");
        }
        self.route = target;
        target
    }

    pub fn login(&mut self, response: &LoginResponse) -> Route {
        if self.auth.record_login(response) {
            self.navigate(Route::Browse)
        } else {
            self.navigate(Route::Login)
        }
    }

    pub fn logout(&mut self) -> Route {
        self.auth.logout();
        self.session = None;
        self.selection.clear();
        self.navigate(Route::Login)
    }

    /// Load catalog page `page`
    pub async fn load_page<S: CatalogSource + ?Sized>(&mut self, source: &S, page: u32) -> bool {
        self.pager.load(source, page).await
    }

    /// Add one unit of a product on the current catalog page
    pub fn add_from_catalog(&mut self, product_id: i64) -> bool {
        let Some(product) = self.pager.item(product_id) else {
            return false;
        };
        self.selection.add(product);
        true
    }

    /// Snapshot the selection and open the review screen
    ///
    /// With nothing selected the shopper stays on browsing.
    pub fn proceed_to_review(&mut self) -> Route {
        if self.guard(Route::Browse) != Route::Browse {
            return self.navigate(Route::Browse);
        }

        match CheckoutSession::initialize(self.selection.snapshot(), self.auth.customer_label()) {
            Ok(session) => {
                self.session = Some(session);
                self.navigate(Route::Review)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Cannot enter review");
                self.navigate(Route::Browse)
            }
        }
    }

    /// Active session; `None` means the shopper belongs on browsing
    pub fn session(&self) -> Option<&CheckoutSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut CheckoutSession> {
        self.session.as_mut()
    }

    /// Pay for the active session from the wallet
    pub fn attempt_payment(&mut self) -> Result<PaymentOutcome, SessionError> {
        let Some(session) = self.session.as_mut() else {
            self.navigate(Route::Browse);
            return Err(SessionError::NoSession);
        };
        session.attempt_payment(&self.wallet)
    }

    /// Show the receipt screen for a paid session
    pub fn show_receipt(
        &mut self,
        sink: &mut dyn ReceiptSink,
        currency: &str,
    ) -> Result<Handoff, SessionError> {
        let Some(session) = self.session.as_mut() else {
            self.navigate(Route::Browse);
            return Err(SessionError::NoSession);
        };
        let handoff = session.hand_off_receipt(sink, currency)?;
        self.navigate(Route::Receipt);
        Ok(handoff)
    }

    /// Leave review or receipt for browsing
    ///
    /// A paid session takes the live selection with it; an unpaid one leaves
    /// the selection for further editing.
    pub fn back_to_browse(&mut self) -> Route {
        if let Some(session) = self.session.take()
            && session.is_payment_processed()
        {
            self.selection.clear();
            tracing::debug!(reference = %session.reference(), "Checkout finished");
        }
        self.navigate(Route::Browse)
    }

    /// Close out a completed payment
    ///
    /// Returns `false` (and changes nothing) when there is no paid session.
    pub fn finish_payment(&mut self) -> bool {
        if !self.session.as_ref().is_some_and(CheckoutSession::is_payment_processed) {
            return false;
        }
        self.back_to_browse();
        true
    }

    /// Full application reload: in-memory state is gone, storage is not
    pub fn reload(&mut self) -> Route {
        self.session = None;
        self.selection.clear();
        let route = self.route;
        self.navigate(route)
    }
}
