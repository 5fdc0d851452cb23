//! Bridge fixtures for tests.

use std::sync::Arc;

use crate::surface::mock::{MockState, StaticFetcher, factory};
use crate::surface::run_blocking;

use super::{Bridge, BridgeOptions};

/// Document served by the fallback fetcher.
pub(crate) const PAGE: &str = "<html><head><title>t</title></head><body></body></html>";

/// Builds a bridge over a mock surface.
pub(crate) fn mock_bridge(state: &Arc<MockState>, native: bool, options: BridgeOptions) -> Bridge {
    Bridge::builder()
        .surface_factory(factory(Arc::clone(state), native))
        .fetcher(StaticFetcher::new(PAGE))
        .options(options)
        .build()
        .unwrap()
}

/// Waits until every job queued on the UI context so far has run.
pub(crate) fn flush_ui(bridge: &Bridge) {
    run_blocking(bridge.inner.ui.as_ref(), || ()).unwrap();
}
