use anyhow::Context;
use mirador_api::{app, AppState};
use mirador_core::repository::{ProposalRepository, ReservationRepository};
use mirador_desk::bids::{BidBook, SimulatedLink};
use mirador_desk::tabs::AlertKind;
use mirador_desk::{Desk, DeskSession};
use mirador_store::proposal_repo::PgProposalRepository;
use mirador_store::realtime::ChangeOp;
use mirador_store::reservation_repo::PgReservationRepository;
use mirador_store::{ChannelManager, DbClient, RedisTransport, SyncBridge};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mirador_api=debug,mirador_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = mirador_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Mirador API on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let transport =
        RedisTransport::new(&config.redis.url).context("Failed to create Redis transport")?;
    let channels = ChannelManager::new(Arc::new(transport));

    let proposal_repo: Arc<dyn ProposalRepository> =
        Arc::new(PgProposalRepository::new(db.pool.clone()));
    let bridge = Arc::new(SyncBridge::new(proposal_repo, channels));

    // Desk boots from the stored roster, or the demo seed when empty
    let reservation_repo = PgReservationRepository::new(db.pool.clone());
    let roster = match reservation_repo.list().await {
        Ok(rows) if !rows.is_empty() => rows,
        Ok(_) => mirador_desk::seed::seed_reservations(),
        Err(err) => {
            tracing::warn!("Roster load failed, using seed data: {}", err);
            mirador_desk::seed::seed_reservations()
        }
    };

    let link = Arc::new(SimulatedLink::default());
    let mut session = DeskSession::new(roster, link.clone());
    session.bids =
        BidBook::new(link).with_expiry_hours(config.business_rules.bid_expiry_hours);
    let desk = Desk::new(session)
        .with_alert_ttl(Duration::from_millis(config.business_rules.alert_ttl_ms));

    let alert_desk = desk.clone();
    bridge
        .watch_proposals(move |event| {
            tracing::info!("Proposal {} changed ({:?})", event.row_id, event.op);
            if event.op == ChangeOp::Update {
                alert_desk.show_alert(
                    AlertKind::Success,
                    format!("Proposal {} updated by the booking system", event.row_id),
                );
            }
        })
        .await
        .context("Failed to subscribe to proposal changes")?;
    bridge
        .watch_orders(|event| {
            tracing::info!("Order {} changed ({:?})", event.row_id, event.op);
        })
        .await
        .context("Failed to subscribe to order changes")?;

    let app_state = AppState {
        bridge,
        desk,
        business_rules: config.business_rules.clone(),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
