//! A small glTF viewer: loads a manifest and its buffers, then redraws the
//! active scene every frame while spinning its root transform.

pub mod config;
pub mod frame_loop;
pub mod renderer;
