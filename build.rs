use std::env;
use std::fs::File;
use std::path::Path;

use gl_generator::{Api, Fallbacks, GlobalGenerator, Profile, Registry};

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let mut bindings = File::create(Path::new(&out_dir).join("bindings.rs")).unwrap();
    // GLES 3.0 is what WebGL 2 exposes through emscripten.
    Registry::new(Api::Gles2, (3, 0), Profile::Core, Fallbacks::All, [])
        .write_bindings(GlobalGenerator, &mut bindings)
        .unwrap();
    println!("cargo:rerun-if-changed=build.rs");
}
