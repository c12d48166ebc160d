//! Send/Sync guarantees for core types.

use std::sync::Arc;

use rstest::rstest;
use static_assertions::{assert_impl_all, assert_obj_safe};
use thingsboard_http::{
    ClientConfig, ClientConfigBuilder, ClientLogger, DefaultLogger, NullLogger, SendError,
    ThingsBoard, Transport, UreqTransport,
};

#[rstest]
fn configuration_is_send_sync() {
    assert_impl_all!(ClientConfig: Send, Sync, Clone);
    assert_impl_all!(ClientConfigBuilder: Send, Sync, Clone);
}

#[rstest]
fn client_is_send_sync() {
    assert_impl_all!(ThingsBoard<UreqTransport>: Send, Sync);
    assert_impl_all!(UreqTransport: Send, Sync, Transport);
    assert_impl_all!(Arc<UreqTransport>: Transport);
    assert_impl_all!(SendError: Send, Sync, std::error::Error);
}

#[rstest]
fn loggers_are_shareable() {
    assert_obj_safe!(ClientLogger);
    assert_impl_all!(DefaultLogger: ClientLogger, Send, Sync);
    assert_impl_all!(NullLogger: ClientLogger, Send, Sync);
    assert_impl_all!(Arc<dyn ClientLogger>: Send, Sync);
}
