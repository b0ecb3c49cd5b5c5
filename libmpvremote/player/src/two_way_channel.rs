use flume::{Receiver, RecvError, Sender};
use tokio::sync::oneshot::{Sender as OneShotSender, channel as oneshot_channel};

pub(crate) fn two_way_channel<TIn, TOut>() -> (TwoWaySender<TIn, TOut>, TwoWayReceiver<TIn, TOut>)
{
    let (main_tx, main_rx) = flume::unbounded();
    (TwoWaySender::new(main_tx), TwoWayReceiver::new(main_rx))
}

type Responder<TIn, TOut> = (TIn, Option<OneShotSender<TOut>>);

#[derive(Debug)]
pub(crate) struct TwoWaySender<TIn, TOut> {
    main_tx: Sender<Responder<TIn, TOut>>,
}

// Derived Clone would require TIn: Clone and TOut: Clone
impl<TIn, TOut> Clone for TwoWaySender<TIn, TOut> {
    fn clone(&self) -> Self {
        Self {
            main_tx: self.main_tx.clone(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct TwoWayReceiver<TIn, TOut> {
    main_rx: Receiver<Responder<TIn, TOut>>,
}

impl<TIn, TOut> TwoWaySender<TIn, TOut> {
    pub(crate) fn new(main_tx: Sender<Responder<TIn, TOut>>) -> Self {
        Self { main_tx }
    }

    pub(crate) async fn get_response(&self, message: TIn) -> Result<TOut, String> {
        let (oneshot_tx, oneshot_rx) = oneshot_channel();
        self.main_tx
            .send_async((message, Some(oneshot_tx)))
            .await
            .map_err(|e| format!("Error sending oneshot response {e:?}"))?;
        oneshot_rx
            .await
            .map_err(|e| format!("Error receiving oneshot response {e:?}"))
    }
}

impl<TIn, TOut> TwoWayReceiver<TIn, TOut> {
    pub(crate) fn new(main_rx: Receiver<Responder<TIn, TOut>>) -> Self {
        Self { main_rx }
    }

    /// Receives the next message along with the handle used to answer it.
    /// The handle can be kept and answered later, out of order with other messages.
    pub(crate) async fn recv_async(&self) -> Result<Responder<TIn, TOut>, RecvError> {
        self.main_rx.recv_async().await
    }
}
