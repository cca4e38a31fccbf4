use core::fmt;
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Extension, Router,
};
use tokio::{net::TcpListener, sync::Notify};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info};

use crate::{
    config::{Config, StorageConfig},
    error::{ConfigError, Error, ServerBuildError},
    intake::IntakeManager,
    notify::{self, NotifyHandle},
    routes::{
        admin::admin_login_route,
        base::health_route,
        gate::{redeem_invite_route, verify_code_route},
        intake::{submit_application_route, submit_request_route, submit_rsvp_route},
    },
    store::{json::JsonFileStore, sqlite::SqliteStore, RecordStore},
};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub struct Signals {
    pub stop: Arc<AtomicBool>,
    pub stop_notify: Arc<Notify>,
}

impl Signals {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
    }

    pub fn clone_stop(&self) -> Arc<AtomicBool> {
        self.stop.to_owned()
    }

    pub fn clone_stop_notify(&self) -> Arc<Notify> {
        self.stop_notify.to_owned()
    }
}

#[derive(Debug)]
pub enum RequiredProperties {
    Config,
}

impl fmt::Display for RequiredProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Config => "Config",
            }
        )
    }
}

async fn start_server(server: Arc<GatehouseServer>) {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(vec![CONTENT_TYPE, AUTHORIZATION, COOKIE])
        .allow_origin(AllowOrigin::list(server.allowed_origins.to_owned()))
        .allow_credentials(true);

    let app = Router::new()
        .route("/api/verify-code", post(verify_code_route))
        .route("/invite", get(redeem_invite_route))
        .route("/api/rsvp", post(submit_rsvp_route))
        .route("/api/request", post(submit_request_route))
        .route("/api/requests", post(submit_request_route))
        .route("/api/applications", post(submit_application_route))
        .route("/api/auth/login", post(admin_login_route))
        .route("/api/health", get(health_route))
        .layer(cors)
        .layer(Extension(server.manager.to_owned()));

    let listener = match TcpListener::bind(server.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {}: {}", server.addr, err);
            server.signals.stop();
            return;
        }
    };
    info!("intake endpoint listening on {}", server.addr);

    tokio::select! {
        result = async { axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await } => {
            if let Err(err) = result {
                error!("server error: {}", err);
                server.signals.stop();
            }
        }
        _ = server.signals.stop_notify.notified() => {},
    }
}

async fn sweep_sessions(server: Arc<GatehouseServer>) {
    let stop_notify = server.signals.clone_stop_notify();
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        tokio::select! {
            _ = interval.tick() => server.manager.sessions.remove_expired().await,
            _ = stop_notify.notified() => break,
        }
    }
}

#[derive(Default)]
pub struct Builder {
    //required
    config: Option<Config>,

    //optional
    stop: Option<Arc<AtomicBool>>,
    stop_notify: Option<Arc<Notify>>,
}

impl Builder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn stop(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn stop_notify(mut self, stop_notify: Arc<Notify>) -> Self {
        self.stop_notify = Some(stop_notify);
        self
    }

    pub async fn start_server(self) -> Result<Arc<GatehouseServer>, Error> {
        let config = match self.config {
            Some(config) => Arc::new(config),
            None => {
                return Err(Error::ServerBuild(ServerBuildError::MissingProperties(
                    RequiredProperties::Config.to_string(),
                )))
            }
        };
        let addr = config.socket_addr()?;

        let mut allowed_origins: Vec<HeaderValue> = Vec::new();
        for allowed_origin in config.server.allowed_origins.iter() {
            let parsed: HeaderValue = allowed_origin
                .parse()
                .map_err(|err| ConfigError::InvalidOrigin(err, allowed_origin.to_owned()))?;
            allowed_origins.push(parsed);
        }

        let store: Arc<dyn RecordStore> = match &config.storage {
            StorageConfig::Json { data_dir } => Arc::new(JsonFileStore::new(data_dir).await?),
            StorageConfig::Sqlite { database_url } => Arc::new(SqliteStore::new(database_url)?),
        };

        let notifier: NotifyHandle = match &config.smtp {
            Some(smtp) => notify::start(smtp)?,
            None => {
                info!("smtp not configured, submission notifications disabled");
                NotifyHandle::disabled()
            }
        };

        let manager = Arc::new(IntakeManager::new(config, store, notifier));
        info!("{} access codes loaded", manager.codes.len());

        let signals = Signals {
            stop: self.stop.unwrap_or(Arc::new(AtomicBool::new(false))),
            stop_notify: self.stop_notify.unwrap_or(Arc::new(Notify::new())),
        };

        let server: Arc<GatehouseServer> = Arc::new(GatehouseServer {
            manager,
            signals,
            addr,
            allowed_origins,
        });

        let server_ = server.to_owned();
        tokio::spawn(async move { start_server(server_).await });
        let server_ = server.to_owned();
        tokio::spawn(async move { sweep_sessions(server_).await });

        Ok(server)
    }
}

pub struct GatehouseServer {
    pub manager: Arc<IntakeManager>,
    pub signals: Signals,
    pub addr: SocketAddr,
    allowed_origins: Vec<HeaderValue>,
}

impl GatehouseServer {
    pub fn builder() -> Builder {
        Builder::default()
    }
}
