fn main() {
    // Only the ESP-IDF build needs the toolchain environment; host builds
    // (tests, fuzzing) skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
