fn main() {
    metapeg::cli::run();
}
