use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// What woke the loop up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    /// The poll interval elapsed. Carries the time of the tick.
    Tick(Instant),
    Input(Event),
}

/// Single-threaded pump that owns input polling for the dock.
///
/// Every iteration first hands the handler a [`LoopEvent::Tick`] (used for
/// drawing, notice expiry and re-clamping), then drains all queued input so
/// fast mouse drags do not fall behind the renderer.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, LoopEvent) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, LoopEvent::Tick(Instant::now()))? {
                return Ok(());
            }

            if self.driver.poll(self.poll_interval)? {
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, LoopEvent::Input(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct Scripted {
        events: VecDeque<Event>,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn drains_queued_input_between_ticks() {
        let driver = Scripted {
            events: VecDeque::from(vec![key('a'), key('b'), key('q')]),
        };
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(1));
        let mut ticks = 0;
        let mut keys = Vec::new();
        event_loop
            .run(|_, event| {
                match event {
                    LoopEvent::Tick(_) => ticks += 1,
                    LoopEvent::Input(Event::Key(k)) => {
                        if k.code == KeyCode::Char('q') {
                            return Ok(ControlFlow::Quit);
                        }
                        keys.push(k.code);
                    }
                    LoopEvent::Input(_) => {}
                }
                Ok(ControlFlow::Continue)
            })
            .unwrap();
        assert_eq!(ticks, 1);
        assert_eq!(keys, vec![KeyCode::Char('a'), KeyCode::Char('b')]);
    }

    #[test]
    fn quit_on_tick_stops_before_polling() {
        let driver = Scripted {
            events: VecDeque::from(vec![key('a')]),
        };
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(1));
        event_loop.run(|_, _| Ok(ControlFlow::Quit)).unwrap();
        assert_eq!(event_loop.driver().events.len(), 1);
    }
}
