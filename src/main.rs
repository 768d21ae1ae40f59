use promingest::error::AppResult;

fn main() -> AppResult<()> {
    promingest::run()
}
