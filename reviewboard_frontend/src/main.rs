fn main() -> anyhow::Result<()> {
    reviewboard_frontend::run_frontend()
}
