//! End-to-end auto-wiring demo: a transient sender built around a shared
//! singleton renderer.
//!
//! Run with: cargo run --example autowiring

use autowire::{service, Construct, Container, Implement};
use std::sync::Arc;

trait Renderer: Send + Sync {
    fn render(&self, message: &str) -> String;
}

trait Sender: Send + Sync {
    fn send(&self, message: &str);
}

service!(dyn Renderer, dyn Sender);

struct AnsiRenderer;

impl Renderer for AnsiRenderer {
    fn render(&self, message: &str) -> String {
        format!("\x1b[1m{message}\x1b[0m")
    }
}

impl Construct for AnsiRenderer {
    type Dependencies = ();

    fn new(_: ()) -> Self {
        AnsiRenderer
    }
}

impl Implement<dyn Renderer> for AnsiRenderer {
    fn upcast(this: Arc<Self>) -> Arc<dyn Renderer> {
        this
    }
}

struct ConsoleSender {
    renderer: Arc<dyn Renderer>,
}

impl Sender for ConsoleSender {
    fn send(&self, message: &str) {
        println!("{}", self.renderer.render(message));
    }
}

impl Construct for ConsoleSender {
    type Dependencies = Arc<dyn Renderer>;

    fn new(renderer: Arc<dyn Renderer>) -> Self {
        ConsoleSender { renderer }
    }
}

impl Implement<dyn Sender> for ConsoleSender {
    fn upcast(this: Arc<Self>) -> Arc<dyn Sender> {
        this
    }
}

fn main() {
    let container = Container::new();
    container.register_singleton::<dyn Renderer, AnsiRenderer>();
    container.register_transient::<dyn Sender, ConsoleSender>();

    let sender = container
        .resolve::<dyn Sender>()
        .expect("sender should resolve");
    sender.send("hello from autowire");

    // Transients are fresh every time, but both share the one renderer.
    let another = container
        .resolve::<dyn Sender>()
        .expect("sender should resolve");
    another.send("same renderer, different sender");
}
