//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};
use crate::error::CassetteError;

/// Replays a cassette, one queue per `port::method` pair.
///
/// Queues are independent, so calls on different methods may interleave
/// differently than they did while recording.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Indexes the cassette's interactions.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Interactions not yet served, across all queues.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Takes the next interaction recorded for `port::method`.
    ///
    /// # Errors
    ///
    /// `NotRecorded` if the cassette holds no such call, `Exhausted` once
    /// every recorded one has been served. `NotRecorded` lists what the
    /// cassette does hold.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<Interaction, CassetteError> {
        let key = (port.to_owned(), method.to_owned());
        let call = format!("{port}::{method}");
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut recorded: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            recorded.sort();
            return Err(CassetteError::NotRecorded { call, recorded: recorded.join(", ") });
        };
        queue.pop_front().ok_or(CassetteError::Exhausted { call })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: "process".into(),
            method: method.into(),
            input: json!({}),
            output,
        }
    }

    fn cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            platform: "linux".into(),
            interactions,
        }
    }

    #[test]
    fn serves_each_method_in_order() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![
            interaction(0, "run", json!(1)),
            interaction(1, "probe", json!("p")),
            interaction(2, "run", json!(2)),
        ]));
        assert_eq!(replayer.remaining(), 3);

        assert_eq!(replayer.next_interaction("process", "run").unwrap().output, json!(1));
        assert_eq!(replayer.next_interaction("process", "run").unwrap().output, json!(2));
        assert_eq!(replayer.next_interaction("process", "probe").unwrap().seq, 1);
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn exhausted_queue_is_an_error() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![interaction(0, "run", json!(1))]));
        replayer.next_interaction("process", "run").unwrap();

        let err = replayer.next_interaction("process", "run").unwrap_err();
        assert!(matches!(err, CassetteError::Exhausted { ref call } if call == "process::run"));
        assert!(err.to_string().contains("already replayed"));
    }

    #[test]
    fn unknown_method_lists_recorded_calls() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![interaction(0, "run", json!(1))]));

        let err = replayer.next_interaction("process", "spawn").unwrap_err();
        assert!(matches!(err, CassetteError::NotRecorded { .. }));
        assert_eq!(
            err.to_string(),
            "Cassette has nothing recorded for process::spawn; it holds [process::run]"
        );
        assert_eq!(replayer.remaining(), 1);
    }
}
