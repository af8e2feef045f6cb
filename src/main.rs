#[actix_web::main]
async fn main() -> std::io::Result<()> {
    demand_planner_lib::run().await
}
