//! Builders wiring adapters into the HTTP and WebSocket states.
//!
//! With a database pool the catalog, ledger and account store are
//! PostgreSQL-backed; without one a shared [`InMemoryStore`] plays all of
//! them. Both modes share one change feed, image store and clock, and both
//! sign users in through [`AccountService`].

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::{
    AccountStore, BookingLedger, CatalogStore, ChangeFeed, IdentityProvider, LoginService,
    ProfileQuery,
};
use backend::domain::{
    AccountService, BookingAdmissionService, BookingQueryService, CatalogService, ProfileService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::inbound::ws::state::WsState;
use backend::outbound::change_feed::BroadcastChangeFeed;
use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::{
    DieselAccountStore, DieselBookingLedger, DieselCatalogStore, DieselIdentityProvider,
};

use super::ServerConfig;

/// Application data shared by every worker.
#[derive(Clone)]
pub(super) struct AppStates {
    pub(super) http: web::Data<HttpState>,
    pub(super) ws: web::Data<WsState>,
}

/// Adapters that differ between database and in-memory mode.
struct Backing<C, L> {
    catalog: Arc<C>,
    ledger: Arc<L>,
    login: Arc<dyn LoginService>,
    profiles: Arc<dyn ProfileQuery>,
}

fn wire<C, L>(
    config: &ServerConfig,
    backing: Backing<C, L>,
    feed: Arc<dyn ChangeFeed>,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    C: CatalogStore + 'static,
    L: BookingLedger + 'static,
{
    let Backing {
        catalog,
        ledger,
        login,
        profiles,
    } = backing;
    let catalog_service = Arc::new(CatalogService::new(
        Arc::clone(&catalog),
        Arc::clone(&ledger),
        Arc::new(config.images.clone()),
        Arc::clone(&feed),
        Arc::clone(&clock),
    ));
    let admission = BookingAdmissionService::new(catalog, Arc::clone(&ledger), feed, clock)
        .with_policy(config.policy);

    HttpStatePorts {
        login,
        profiles,
        catalog: catalog_service.clone(),
        catalog_query: catalog_service,
        bookings: Arc::new(admission),
        bookings_query: Arc::new(BookingQueryService::new(ledger)),
    }
}

fn profiles_over<P>(identities: Arc<P>) -> Arc<dyn ProfileQuery>
where
    P: IdentityProvider + 'static,
{
    Arc::new(ProfileService::new(identities))
}

async fn sign_in_over<A>(
    config: &ServerConfig,
    accounts: Arc<A>,
) -> io::Result<Arc<dyn LoginService>>
where
    A: AccountStore + 'static,
{
    let service = AccountService::new(accounts);
    if config.development_accounts {
        service
            .seed_development_accounts()
            .await
            .map_err(io::Error::other)?;
    }
    Ok(Arc::new(service))
}

/// Build the HTTP and WebSocket states for the configured backing store.
///
/// # Errors
/// Fails when the development accounts are enabled but cannot be created.
pub(super) async fn build_states(config: &ServerConfig) -> io::Result<AppStates> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let feed: Arc<dyn ChangeFeed> = Arc::new(BroadcastChangeFeed::default());

    let ports = match &config.db_pool {
        Some(pool) => {
            let backing = Backing {
                catalog: Arc::new(DieselCatalogStore::new(pool.clone())),
                ledger: Arc::new(DieselBookingLedger::new(pool.clone())),
                login: sign_in_over(config, Arc::new(DieselAccountStore::new(pool.clone())))
                    .await?,
                profiles: profiles_over(Arc::new(DieselIdentityProvider::new(pool.clone()))),
            };
            wire(config, backing, Arc::clone(&feed), Arc::clone(&clock))
        }
        None => {
            let store = Arc::new(InMemoryStore::new(Arc::clone(&clock)));
            let backing = Backing {
                catalog: Arc::clone(&store),
                ledger: Arc::clone(&store),
                login: sign_in_over(config, Arc::clone(&store)).await?,
                profiles: profiles_over(store),
            };
            wire(config, backing, Arc::clone(&feed), Arc::clone(&clock))
        }
    };

    let ws = WsState::new(Arc::clone(&ports.profiles), feed, config.origins.clone());
    Ok(AppStates {
        http: web::Data::new(HttpState::new(ports)),
        ws: web::Data::new(ws),
    })
}
