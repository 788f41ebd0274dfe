fn main() {
    std::process::exit(prioqueue::app::startup::startup());
}
