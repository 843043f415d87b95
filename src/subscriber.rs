//! MQTT event loop for the tag subscriber process.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::{
    config::{Config, RESPONSE_TOPIC, TAG_TOPIC},
    error::AppError,
    handler::{Publisher, handle_tag_message},
    store::RedisStore,
};

pub struct MqttPublisher {
    client: AsyncClient,
}

impl Publisher for MqttPublisher {
    async fn publish(&self, payload: &str) -> Result<(), AppError> {
        self.client
            .publish(RESPONSE_TOPIC, QoS::AtLeastOnce, false, payload.to_owned())
            .await?;

        Ok(())
    }
}

/// Runs forever. A lost broker connection is logged and retried on the next
/// poll; a failed message leaves the loop alive.
pub async fn run(config: &Config, store: &RedisStore) {
    let mut options = MqttOptions::new("checkin-subscriber", &config.mqtt_host, config.mqtt_port);
    options.set_keep_alive(Duration::from_secs(60));

    let (client, mut events) = AsyncClient::new(options, 10);
    let publisher = MqttPublisher {
        client: client.clone(),
    };

    info!(
        "Subscribing to {TAG_TOPIC} on {}:{}",
        config.mqtt_host, config.mqtt_port
    );

    loop {
        match events.poll().await {
            // subscribe on every ConnAck so a reconnect re-establishes it
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!(code = ?ack.code, "Connected to broker");
                if let Err(e) = client.subscribe(TAG_TOPIC, QoS::AtLeastOnce).await {
                    error!("Subscribe failed: {e}");
                }
            }
            Ok(Event::Incoming(Packet::Publish(message))) => {
                if message.topic != TAG_TOPIC {
                    continue;
                }
                if let Err(e) = handle_tag_message(store, &publisher, &message.payload).await {
                    error!("Message dropped: {e}");
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Broker connection lost: {e}");
                sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
