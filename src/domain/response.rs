#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOutcome {
    /// The gateway accepted the message (`Message was sent.`).
    Sent,
    /// The gateway refused the message (`Message was not sent.`), e.g. for bad credentials.
    NotSent,
    /// Any other body. Inspect [`GatewayResponse::body`].
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
    pub outcome: GatewayOutcome,
}

impl GatewayResponse {
    pub fn is_sent(&self) -> bool {
        self.outcome == GatewayOutcome::Sent
    }
}
