use anyhow::{Context, Result};
use sqlite_dbinfo::db::{Database, DbInfo};

pub fn dbinfo(path: &str) -> Result<()> {
    let info = read_info(path)?;
    let header = &info.header;
    let text_encoding = match header.text_encoding() {
        Ok(encoding) => encoding.to_string(),
        Err(code) => format!("unknown ({code})"),
    };

    println!("database page size:  {}", info.page_size);
    println!("write format:        {}", header.write_version);
    println!("read format:         {}", header.read_version);
    println!("reserved bytes:      {}", header.reserved_space);
    println!("file change counter: {}", header.file_change_counter);
    println!("database page count: {}", info.page_count);
    println!("freelist page count: {}", header.freelist_page_count);
    println!("schema cookie:       {}", header.schema_cookie);
    println!("schema format:       {}", header.schema_format);
    println!("default cache size:  {}", header.default_cache_size);
    println!("autovacuum top root: {}", header.largest_root_page);
    println!("incremental vacuum:  {}", header.incremental_vacuum);
    println!("text encoding:       {}", text_encoding);
    println!("user version:        {}", header.user_version);
    println!("application id:      {}", header.application_id);
    println!("software version:    {}", header.sqlite_version_number);
    println!("number of tables:    {}", info.number_of_tables);
    Ok(())
}

pub fn tables(path: &str) -> Result<()> {
    let info = read_info(path)?;
    println!("{}", info.user_table_names().join(" "));
    Ok(())
}

fn read_info(path: &str) -> Result<DbInfo> {
    Database::open(path)
        .and_then(|mut db| db.parse())
        .with_context(|| format!("Failed to read database info from {path}"))
}
