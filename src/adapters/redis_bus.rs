//! Redis pub/sub adapter.
//!
//! Uses the synchronous `redis` client: every process in the mesh runs a
//! single blocking loop, so there is no executor to hand work to.
//!
//! A subscription borrows its connection for as long as it lives; dropping
//! the [`RedisSubscription`] unsubscribes.

use std::time::Duration;

use log::info;
use redis::{Client, Commands, Connection, PubSub};

use crate::app::ports::{Publisher, Subscriber};
use crate::config::BusConfig;
use crate::error::BusError;
use crate::message::Topic;

/// Open one connection to the broker described by `config`.
pub fn connect(config: &BusConfig) -> Result<Connection, BusError> {
    let connect_err = |source| BusError::Connect {
        addr: config.addr(),
        source,
    };
    let client = Client::open(config.url()).map_err(connect_err)?;
    let conn = client.get_connection().map_err(connect_err)?;
    info!("Connected to redis instance at {}", config.addr());
    Ok(conn)
}

// ── Publish ───────────────────────────────────────────────────

pub struct RedisPublisher {
    conn: Connection,
}

impl RedisPublisher {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connect(config: &BusConfig) -> Result<Self, BusError> {
        connect(config).map(Self::new)
    }
}

impl Publisher for RedisPublisher {
    fn publish(&mut self, topic: &Topic, payload: &[u8]) -> Result<(), BusError> {
        // Receiver count; zero listeners is still a successful publish.
        let _receivers: i64 = self
            .conn
            .publish(topic.as_str(), payload)
            .map_err(|source| BusError::Publish {
                topic: topic.to_string(),
                source,
            })?;
        Ok(())
    }
}

// ── Subscribe ─────────────────────────────────────────────────

pub struct RedisSubscription<'a> {
    pubsub: PubSub<'a>,
    topic: Topic,
}

impl<'a> RedisSubscription<'a> {
    /// Subscribe `conn` to `topic`.  `read_timeout` bounds each wait in
    /// [`Subscriber::next_message`] so the caller can observe shutdown.
    ///
    /// The broker's subscribe confirmation is consumed here and never
    /// reaches the caller.
    pub fn new(
        conn: &'a mut Connection,
        topic: Topic,
        read_timeout: Duration,
    ) -> Result<Self, BusError> {
        let sub_err = |source| BusError::Subscribe {
            topic: topic.to_string(),
            source,
        };
        let mut pubsub = conn.as_pubsub();
        pubsub.subscribe(topic.as_str()).map_err(sub_err)?;
        pubsub
            .set_read_timeout(Some(read_timeout))
            .map_err(sub_err)?;
        info!("Subscribed to {}", topic);
        Ok(Self { pubsub, topic })
    }
}

impl Subscriber for RedisSubscription<'_> {
    fn next_message(&mut self) -> Result<Option<Vec<u8>>, BusError> {
        match self.pubsub.get_message() {
            Ok(msg) => Ok(Some(msg.get_payload_bytes().to_vec())),
            Err(e) if e.is_timeout() => Ok(None),
            Err(e) => Err(BusError::Receive(e)),
        }
    }

    fn topic(&self) -> &Topic {
        &self.topic
    }
}
