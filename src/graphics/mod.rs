pub use self::renderer::Renderer;

mod helpers;
mod renderer;
mod shaders;
