fn main() {
    uniffi::generate_scaffolding("src/diveplan.udl").expect("failed to generate uniffi scaffolding");
}
