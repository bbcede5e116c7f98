/// The session's position in the handshake/record state machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    AwaitingServerHello,
    Established,
    Failed,
}
