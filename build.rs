fn main() {
    println!("cargo:rerun-if-env-changed=STILLPOS_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
