use std::sync::Arc;

use anyhow::Context;
use log::{error, info};
use vulkano::swapchain::Surface;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

#[cfg(feature = "tracy")]
use tracing_tracy::client::frame_mark;

use crate::{
    animation::Stopwatch,
    animator::Animator,
    graphics::Renderer,
    plot::WINDOW_TITLE,
};

/// Owns the window and feeds redraws to the animator and renderer.
pub struct App {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    animator: Animator,
    renderer: Renderer,
}

impl App {
    pub fn new(animator: Animator) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("creating event loop")?;
        let required_extensions = Surface::required_extensions(&event_loop);

        let window = Arc::new(
            WindowBuilder::new()
                .with_title(WINDOW_TITLE)
                .with_inner_size(LogicalSize::new(1260.0, 630.0))
                .build(&event_loop)
                .context("Error creating window")?,
        );

        let renderer = Renderer::new(required_extensions, window.clone())?;

        Ok(App {
            event_loop,
            window,
            animator,
            renderer,
        })
    }

    pub fn run(self) -> anyhow::Result<()> {
        let App {
            event_loop,
            window,
            mut animator,
            mut renderer,
        } = self;

        let mut stopwatch: Stopwatch = Stopwatch::start();
        window.set_title(&animator.caption());

        info!("Running animation");

        event_loop
            .run(move |event, elwt: &EventLoopWindowTarget<()>| {
                elwt.set_control_flow(if animator.is_finished() {
                    ControlFlow::Wait
                } else {
                    ControlFlow::Poll
                });

                match event {
                    Event::WindowEvent {
                        event: WindowEvent::CloseRequested,
                        ..
                    }
                    | Event::WindowEvent {
                        event:
                            WindowEvent::KeyboardInput {
                                event:
                                    KeyEvent {
                                        logical_key: Key::Named(NamedKey::Escape),
                                        state: ElementState::Pressed,
                                        ..
                                    },
                                ..
                            },
                        ..
                    } => {
                        info!("Window closed at frame {}", animator.state().frame());
                        elwt.exit();
                    }
                    Event::WindowEvent {
                        event: WindowEvent::Resized(new_size),
                        ..
                    } => {
                        renderer.window_resized(new_size);
                        window.request_redraw();
                    }
                    Event::WindowEvent {
                        event: WindowEvent::RedrawRequested,
                        ..
                    } => {
                        if animator.update(stopwatch.lap()).is_some() {
                            window.set_title(&animator.caption());
                            if animator.is_finished() {
                                info!("{}", animator.caption());
                            }
                        }

                        if let Err(e) = renderer.draw(&animator.scene()) {
                            error!("Error drawing: {:#?}", e);
                            elwt.exit();
                        }

                        #[cfg(feature = "tracy")]
                        frame_mark();
                    }
                    Event::AboutToWait => {
                        if !animator.is_finished() {
                            window.request_redraw();
                        }
                    }
                    _ => (),
                }
            })
            .context("Processing EventLoop")
    }
}
