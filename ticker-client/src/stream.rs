use log::{debug, info, warn};
use ticker_client::{Session, SessionError};
use ticker_core::{Message, Payload, Ticker};

/// Читает сессию, пока её не закроют. Закрытие считается штатным выходом.
pub(crate) fn run_receiver(session: &Session) -> anyhow::Result<()> {
    loop {
        match session.receive() {
            Ok(msg) => handle_message(&msg),
            Err(SessionError::ClosedStream) => {
                info!("stream closed");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn handle_message(msg: &Message) {
    if let Some(ticker) = Ticker::from_message(msg) {
        info!("{ticker}");
        return;
    }

    match msg.payload() {
        Payload::Connect(_) => info!("connected to endpoint {:?}", msg.endpoint()),
        Payload::Disconnect(_) => info!("disconnected from endpoint {:?}", msg.endpoint()),
        Payload::Error(reason) => warn!("server error: {reason}"),
        _ => debug!("{msg}"),
    }
}
