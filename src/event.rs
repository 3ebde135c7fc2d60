use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
}

/// Forwards terminal input. Sampling cadence is driven by the run loop, so
/// there is no tick event here.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let task = tokio::spawn(async move {
            let mut reader = EventStream::new();

            while let Some(maybe_event) = reader.next().await {
                let evt = match maybe_event {
                    Ok(evt) => evt,
                    Err(err) => {
                        tracing::warn!(error = %err, "terminal event stream failed");
                        break;
                    }
                };
                let mapped = match evt {
                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                    _ => None,
                };
                if let Some(e) = mapped
                    && tx.send(e).is_err()
                {
                    break;
                }
            }
        });

        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
