//! Sequential delivery of host callbacks
//!
//! Interrupt handlers and host tasks post events, a single consumer feeds
//! them to the engine in order. The engine itself never runs two callbacks
//! at once.

use embassy_sync::{
    blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex},
    channel::Channel,
};

use super::config::EVENT_QUEUE_DEPTH;
use crate::{
    complication::{data::ComplicationData, registry::ComplicationId},
    engine::{RenderEngine, TapKind},
    error::Error,
    platform::{TimerToken, WatchFaceHost},
};

/// Host callback waiting to be delivered to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Create,
    Destroy,
    PropertiesChanged {
        low_bit_ambient: bool,
        burn_in_protection: bool,
    },
    /// New data for a complication, `None` once its provider is gone
    ComplicationData {
        id: ComplicationId,
        data: Option<ComplicationData>,
    },
    AmbientModeChanged(bool),
    VisibilityChanged(bool),
    SurfaceChanged {
        width: u32,
        height: u32,
    },
    ApplyInsets {
        round: bool,
    },
    TimeTick,
    TimeZoneChanged,
    Tap {
        kind: TapKind,
        x: i32,
        y: i32,
        /// Epoch milliseconds
        time: i64,
    },
    TimerFired(TimerToken),
}

/// Queue usable from interrupt context, sized for a static
pub type HostEventQueue = EventQueue<CriticalSectionRawMutex, EVENT_QUEUE_DEPTH>;

/// Bounded FIFO of engine events
pub struct EventQueue<M: RawMutex, const N: usize> {
    channel: Channel<M, EngineEvent, N>,
}

impl<M: RawMutex, const N: usize> Default for EventQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> EventQueue<M, N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue without waiting
    pub fn post(&self, event: EngineEvent) -> Result<(), Error> {
        self.channel.try_send(event).map_err(|_| {
            warn!("Event queue full, dropping event");
            Error::QueueFull
        })
    }

    /// Deliver every queued event, returns how many were handled
    pub fn dispatch_pending<H: WatchFaceHost>(&self, engine: &mut RenderEngine<H>) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.channel.try_receive() {
            engine.handle(event);
            handled += 1;
        }
        handled
    }

    /// Deliver events as they arrive, forever
    pub async fn run<H: WatchFaceHost>(&self, engine: &mut RenderEngine<H>) {
        loop {
            let event = self.channel.receive().await;
            engine.handle(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{system::config::WatchFaceConfig, testing::MockHost};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::{
        future::Future,
        pin::pin,
        sync::Arc,
        task::{Context, Wake, Waker},
    };

    struct NoopWake;

    impl Wake for NoopWake {
        fn wake(self: Arc<Self>) {}
    }

    #[test]
    fn full_queue_rejects_events() {
        let queue: EventQueue<NoopRawMutex, 2> = EventQueue::new();
        assert_eq!(queue.post(EngineEvent::TimeTick), Ok(()));
        assert_eq!(queue.post(EngineEvent::TimeTick), Ok(()));
        assert_eq!(queue.post(EngineEvent::TimeTick), Err(Error::QueueFull));
    }

    #[test]
    fn events_are_delivered_in_order() {
        let queue: EventQueue<NoopRawMutex, 4> = EventQueue::new();
        let mut engine = RenderEngine::new(MockHost::default(), WatchFaceConfig::default());

        queue.post(EngineEvent::Create).unwrap();
        queue.post(EngineEvent::VisibilityChanged(true)).unwrap();
        queue.post(EngineEvent::AmbientModeChanged(true)).unwrap();

        assert_eq!(queue.dispatch_pending(&mut engine), 3);
        assert_eq!(queue.dispatch_pending(&mut engine), 0);

        // Visible, then ambient: the timer was armed and stopped again
        assert!(engine.is_visible());
        assert!(!engine.is_timer_running());
        assert_eq!(engine.host().cancelled.len(), 1);
    }

    #[test]
    fn run_handles_events_as_they_arrive() {
        let queue: EventQueue<NoopRawMutex, 4> = EventQueue::new();
        let mut engine = RenderEngine::new(MockHost::default(), WatchFaceConfig::default());
        let waker = Waker::from(Arc::new(NoopWake));
        let mut cx = Context::from_waker(&waker);

        queue.post(EngineEvent::Create).unwrap();
        {
            let mut run = pin!(queue.run(&mut engine));
            // Drains the queue, then waits for more
            assert!(run.as_mut().poll(&mut cx).is_pending());

            queue.post(EngineEvent::VisibilityChanged(true)).unwrap();
            queue.post(EngineEvent::TimeTick).unwrap();
            assert!(run.as_mut().poll(&mut cx).is_pending());
        }

        assert_eq!(queue.dispatch_pending(&mut engine), 0);
        assert!(engine.is_visible());
        assert!(engine.is_timer_running());
        // One redraw for becoming visible, one for the tick
        assert_eq!(engine.host().redraws, 2);
    }
}
