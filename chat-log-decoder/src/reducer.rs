//! Last-event-wins status reduction
//!
//! Groups events by exact user name, keeps each user's latest event and maps
//! it to a status. Events with the same timestamp are ordered by source line,
//! and after that by their position in the input slice.

use crate::types::{Event, StatusTable, UserStatus};
use std::collections::HashMap;

/// Builds the final status table from extracted events
pub struct StatusReducer;

impl StatusReducer {
    /// Reduce events into one row per user, `In` rows first, then by name
    pub fn reduce(events: &[Event]) -> StatusTable {
        let mut latest: HashMap<&str, &Event> = HashMap::new();

        for event in events {
            latest
                .entry(event.user.as_str())
                .and_modify(|current| {
                    // `>=` lets a later duplicate replace an equal key
                    if event.order_key() >= current.order_key() {
                        *current = event;
                    }
                })
                .or_insert(event);
        }

        let mut rows: Vec<UserStatus> = latest
            .into_iter()
            .map(|(user, event)| UserStatus::new(user, event.action.status()))
            .collect();
        rows.sort_by(|a, b| a.status.cmp(&b.status).then_with(|| a.user.cmp(&b.user)));

        log::debug!("Reduced {} events to {} users", events.len(), rows.len());

        StatusTable::from_sorted_rows(rows)
    }
}

/// Events in chronological order; equal keys keep their input order
pub fn sorted_events(events: &[Event]) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(Event::order_key);
    sorted
}
