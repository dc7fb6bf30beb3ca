fn main() -> eframe::Result<()> {
    mc_app::logging::init();
    mc_app::launch()
}
