fn main() -> anyhow::Result<()> {
    env_logger::init();
    zmkmap_rust::run()
}
