use async_trait::async_trait;
use connectors::{
    error::WarehouseError,
    warehouse::{TableLister, WarehouseConnection, WarehouseConnector},
};
use model::{
    core::secret::Secret,
    execution::{
        config::{MigrationConfig, StagingConfig},
        connection::WarehouseEndpoint,
    },
};
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub const SOURCE_HOST: &str = "src.example";
pub const DEST_HOST: &str = "dst.example";

pub fn config(truncate_before_load: bool) -> MigrationConfig {
    MigrationConfig {
        staging: StagingConfig {
            bucket: "b".into(),
            access_key: "ak".into(),
            secret_key: Secret::new("sk"),
        },
        source: WarehouseEndpoint::new(SOURCE_HOST, "su", Secret::new("sp")),
        destination: WarehouseEndpoint::new(DEST_HOST, "du", Secret::new("dp")),
        database: "db".into(),
        schema: "s".into(),
        truncate_before_load,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connect,
    Execute(String),
    Commit,
    Close,
}

/// Statement-level behaviour the fake warehouse should exhibit.
#[derive(Clone)]
enum Rule {
    Reject { host: String, needle: String },
    Panic { host: String, needle: String },
    Delay { host: String, needle: String, by: Duration },
}

/// Records every call per host and plays back scripted failures.
#[derive(Default)]
pub struct FakeWarehouse {
    log: Mutex<Vec<(String, Event)>>,
    rules: Mutex<Vec<Rule>>,
    failing_connects: AtomicUsize,
    notices: Mutex<Vec<String>>,
}

impl FakeWarehouse {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Rejects any statement on `host` containing `needle`.
    pub fn reject(&self, host: &str, needle: &str) {
        self.rules.lock().unwrap().push(Rule::Reject {
            host: host.into(),
            needle: needle.into(),
        });
    }

    /// Panics inside `execute` for any statement on `host` containing `needle`.
    pub fn panic_on(&self, host: &str, needle: &str) {
        self.rules.lock().unwrap().push(Rule::Panic {
            host: host.into(),
            needle: needle.into(),
        });
    }

    /// Holds any statement on `host` containing `needle` for `by` before running it.
    pub fn delay(&self, host: &str, needle: &str, by: Duration) {
        self.rules.lock().unwrap().push(Rule::Delay {
            host: host.into(),
            needle: needle.into(),
            by,
        });
    }

    /// The next `count` connection attempts fail, whichever task makes them.
    pub fn fail_next_connects(&self, count: usize) {
        self.failing_connects.store(count, Ordering::SeqCst);
    }

    pub fn notice(&self, text: &str) {
        self.notices.lock().unwrap().push(text.into());
    }

    pub fn events(&self, host: &str) -> Vec<Event> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(h, _)| h == host)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn statements(&self, host: &str) -> Vec<String> {
        self.events(host)
            .into_iter()
            .filter_map(|e| match e {
                Event::Execute(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, host: &str, event: &Event) -> usize {
        self.events(host).iter().filter(|e| *e == event).count()
    }

    fn record(&self, host: &str, event: Event) {
        self.log.lock().unwrap().push((host.to_string(), event));
    }

    fn take_connect_failure(&self) -> bool {
        self.failing_connects
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[derive(Clone)]
pub struct FakeConnector(pub Arc<FakeWarehouse>);

#[async_trait]
impl WarehouseConnector for FakeConnector {
    async fn connect(
        &self,
        endpoint: &WarehouseEndpoint,
        _database: &str,
    ) -> Result<Box<dyn WarehouseConnection>, WarehouseError> {
        if self.0.take_connect_failure() {
            return Err(WarehouseError::connect(
                endpoint.to_string(),
                "connection refused",
            ));
        }
        self.0.record(&endpoint.host, Event::Connect);
        Ok(Box::new(FakeConnection {
            host: endpoint.host.clone(),
            warehouse: self.0.clone(),
        }))
    }
}

struct FakeConnection {
    host: String,
    warehouse: Arc<FakeWarehouse>,
}

#[async_trait]
impl WarehouseConnection for FakeConnection {
    async fn execute(&mut self, sql: &str) -> Result<(), WarehouseError> {
        self.warehouse
            .record(&self.host, Event::Execute(sql.to_string()));

        let rules = self.warehouse.rules.lock().unwrap().clone();
        for rule in rules {
            match rule {
                Rule::Reject { host, needle } if host == self.host && sql.contains(&needle) => {
                    return Err(WarehouseError::rejected(format!(
                        "statement rejected: {needle}"
                    )));
                }
                Rule::Panic { host, needle } if host == self.host && sql.contains(&needle) => {
                    panic!("fake warehouse blew up on {needle}");
                }
                Rule::Delay { host, needle, by } if host == self.host && sql.contains(&needle) => {
                    tokio::time::sleep(by).await;
                }
                _ => {}
            }
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), WarehouseError> {
        self.warehouse.record(&self.host, Event::Commit);
        Ok(())
    }

    fn notices(&mut self) -> Vec<String> {
        std::mem::take(&mut *self.warehouse.notices.lock().unwrap())
    }

    async fn close(&mut self) -> Result<(), WarehouseError> {
        self.warehouse.record(&self.host, Event::Close);
        Ok(())
    }
}

pub struct FakeLister {
    result: Result<Vec<String>, String>,
}

impl FakeLister {
    pub fn tables(tables: &[&str]) -> Self {
        Self {
            result: Ok(tables.iter().map(|t| t.to_string()).collect()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl TableLister for FakeLister {
    async fn list_tables(&self, _schema: &str) -> Result<Vec<String>, WarehouseError> {
        self.result.clone().map_err(WarehouseError::rejected)
    }
}
