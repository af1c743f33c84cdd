use crate::error::WarehouseError;
use futures_util::{StreamExt, pin_mut, stream};
use std::error::Error as _;
use model::execution::connection::{SslMode, WarehouseEndpoint};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
    task::JoinHandle,
};
use tokio_postgres::{
    AsyncMessage, Client, Config, Connection, NoTls, config::SslMode as PgSslMode,
};
use tracing::{error, info, warn};

/// A connected client plus the task driving its socket.
pub(crate) struct Session {
    pub client: Client,
    pub driver: JoinHandle<()>,
    pub notices: mpsc::UnboundedReceiver<String>,
}

pub(crate) fn pg_config(endpoint: &WarehouseEndpoint, database: &str) -> Config {
    let mut config = Config::new();
    config
        .host(&endpoint.host)
        .port(endpoint.port)
        .dbname(database)
        .user(&endpoint.user)
        .password(endpoint.password.expose())
        .ssl_mode(match endpoint.ssl_mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
        });
    config
}

pub(crate) async fn open_session(
    endpoint: &WarehouseEndpoint,
    database: &str,
) -> Result<Session, WarehouseError> {
    info!("Connecting to: {}", endpoint.describe(database));

    let config = pg_config(endpoint, database);
    let target = endpoint.to_string();

    match endpoint.ssl_mode {
        SslMode::Disable => connect_without_tls(config, &target).await,
        SslMode::Require => connect_with_tls(config, &target).await,
        SslMode::Prefer => match connect_with_tls(config.clone(), &target).await {
            Err(error) if error.is_tls() => {
                warn!(%error, "Redshift TLS handshake failed, retrying without TLS");
                connect_without_tls(config, &target).await
            }
            other => other,
        },
    }
}

async fn connect_with_tls(config: Config, target: &str) -> Result<Session, WarehouseError> {
    let connector = TlsConnector::builder().build()?;
    let tls = MakeTlsConnector::new(connector);
    let (client, connection) = config.connect(tls).await.map_err(|e| {
        if failed_in_tls(&e) {
            WarehouseError::TlsHandshake {
                target: target.to_string(),
                message: e.to_string(),
            }
        } else {
            WarehouseError::connect(target, e.to_string())
        }
    })?;
    Ok(spawn_driver(client, connection))
}

async fn connect_without_tls(config: Config, target: &str) -> Result<Session, WarehouseError> {
    let (client, connection) = config
        .connect(NoTls)
        .await
        .map_err(|e| WarehouseError::connect(target, e.to_string()))?;
    Ok(spawn_driver(client, connection))
}

/// Whether the driver error was raised by the TLS stream rather than the
/// server, e.g. a certificate the client refuses.
fn failed_in_tls(err: &tokio_postgres::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if cause.is::<native_tls::Error>() {
            return true;
        }
        source = cause.source();
    }
    false
}

/// Polls the connection on its own task, forwarding server notices to the
/// session's channel. The task ends once the client is dropped.
fn spawn_driver<S, T>(client: Client, mut connection: Connection<S, T>) -> Session
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    let driver = tokio::spawn(async move {
        let messages = stream::poll_fn(move |cx| connection.poll_message(cx));
        pin_mut!(messages);

        while let Some(message) = messages.next().await {
            match message {
                Ok(AsyncMessage::Notice(notice)) => {
                    // receiver gone means the session was closed
                    let _ = tx.send(notice.message().to_string());
                }
                Ok(_) => {}
                Err(err) => {
                    error!(%err, "Redshift connection error");
                    break;
                }
            }
        }
    });

    Session {
        client,
        driver,
        notices: rx,
    }
}
