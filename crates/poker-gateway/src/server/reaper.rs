//! Idle room eviction

use poker_service::RoomService;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::server::GatewayState;

/// Periodically evict rooms nobody has been connected to for the configured
/// idle period
pub fn spawn_room_reaper(state: GatewayState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let rooms = state.config().rooms.clone();
        let mut sweep = interval(rooms.sweep_interval());
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        sweep.tick().await;

        loop {
            sweep.tick().await;

            if state.rooms().is_empty() {
                continue;
            }

            let evicted =
                RoomService::new(state.service_context()).evict_idle_rooms(rooms.idle_ttl());
            if evicted > 0 {
                tracing::info!(
                    evicted,
                    live_rooms = state.rooms().len(),
                    occupied_rooms = state.registry().room_count(),
                    "Evicted idle rooms"
                );
            }
        }
    })
}
