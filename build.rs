fn main() {
    println!("cargo:rerun-if-env-changed=GREENHOUSE_CONFIG_JSON");

    // Host builds (tests, fuzzing) have no ESP-IDF toolchain to link against.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
