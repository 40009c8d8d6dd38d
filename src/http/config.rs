use std::time::Duration;

/// Deadlines applied by the blocking HTTP client. `None` leaves the request without a deadline.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HttpConfig {
    pub(crate) timeout: Option<Duration>,
    pub(crate) conn_timeout: Option<Duration>,
}

impl HttpConfig {
    pub fn new(timeout: Option<Duration>, conn_timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            conn_timeout,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn conn_timeout(&self) -> Option<Duration> {
        self.conn_timeout
    }
}
