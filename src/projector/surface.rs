//! Display surfaces that receive countdown frames.

use tokio::sync::watch;

use super::Countdown;

/// Something that renders the countdown.
///
/// The projector checks [`DisplaySurface::is_alive`] before every frame and
/// stops once the surface is gone.
pub trait DisplaySurface: Send {
    /// Whether the surface can still be rendered to.
    fn is_alive(&self) -> bool;

    /// Render one countdown frame.
    fn render(&mut self, countdown: &Countdown);
}

/// Publishes countdown frames into a `watch` channel.
///
/// Alive while at least one receiver exists.
#[derive(Debug)]
pub struct ChannelSurface {
    tx: watch::Sender<Countdown>,
}

impl ChannelSurface {
    #[must_use]
    pub fn new() -> (Self, watch::Receiver<Countdown>) {
        let (tx, rx) = watch::channel(Countdown::no_recent_activity());
        (Self { tx }, rx)
    }
}

impl DisplaySurface for ChannelSurface {
    fn is_alive(&self) -> bool {
        !self.tx.is_closed()
    }

    fn render(&mut self, countdown: &Countdown) {
        // Only fails once every receiver is gone, which is_alive reports.
        let _ = self.tx.send(*countdown);
    }
}
