fn main() {
    std::process::exit(obras_control::run());
}
