use std::env;
use std::path::PathBuf;

fn main() {
    // Use the vendored protoc unless the caller already points at one.
    if env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()
            .unwrap_or_else(|e| panic!("No vendored protoc for this platform: {}", e));
        env::set_var("PROTOC", protoc);
    }

    println!("cargo:rerun-if-changed=proto");

    tonic_build::compile_protos("proto/health.proto").unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let descriptor_path = out_dir.join("apifinder_descriptor.bin");

    tonic_build::configure()
        .file_descriptor_set_path(descriptor_path)
        .compile_protos(&["proto/apifinder.proto"], &["proto"])
        .unwrap_or_else(|e| panic!("Failed to compile proto files: {}", e));
}
