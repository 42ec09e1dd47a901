use std::error::Error;

use yarn_oee::db::default_db_path;
use yarn_oee::seed::{self, DEFAULT_RECORD_COUNT};

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args().nth(1).unwrap_or_else(default_db_path);

    let record_count = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_RECORD_COUNT)
        .max(1);

    let summary = seed::reset_and_seed(&db_path, record_count)?;

    println!("数据库生成完成: {} ({} 行)", summary.db_path, summary.record_count);
    Ok(())
}
