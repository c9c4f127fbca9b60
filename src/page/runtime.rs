use std::collections::VecDeque;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

use crate::jobs::JobsClient;
use crate::storage::Storage;

use super::{Effect, Event, Page};

/// Performs the effects a dispatch produced. Every `FetchJobs` starts its own
/// request; requests run concurrently and each result is dispatched back into
/// the page as it completes, so the last one to finish wins the panel.
/// Effects the page cannot perform itself (scrolling) are returned to the host.
pub async fn settle<S: Storage>(
    page: &mut Page<S>,
    jobs: &JobsClient,
    effects: Vec<Effect>,
) -> Vec<Effect> {
    let mut pending: VecDeque<Effect> = effects.into();
    let mut in_flight = FuturesUnordered::new();
    let mut unhandled = Vec::new();
    loop {
        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::FetchJobs => in_flight.push(jobs.load_jobs()),
                other => {
                    debug!(?other, "effect left to host");
                    unhandled.push(other);
                }
            }
        }
        match in_flight.next().await {
            Some(result) => pending.extend(page.dispatch(Event::JobsLoaded(result))),
            None => break,
        }
    }
    unhandled
}
