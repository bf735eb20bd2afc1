use log::LevelFilter;

use ordo_skip_list::skip_list::{SkipList, SkipListBuilder};
use ordo_skip_list::Result;

fn main() {
    let mut logger = env_logger::builder();
    logger.filter_level(LevelFilter::Info);
    logger.init();

    if let Err(e) = main_impl() {
        eprintln!("Error: {:?}", e.to_string());
    }
}

fn main_impl() -> Result<()> {
    let mut builder = SkipListBuilder::default();
    builder.set_max_level(16).set_probability(0.5);
    let list: SkipList<String, String> = builder.build();

    for (key, value) in [("one", "1"), ("two", "2"), ("three", "3")] {
        list.insert(key.to_string(), value.to_string());
    }
    list.update(&"two".to_string(), "22".to_string());
    list.erase(&"three".to_string());

    let mut dump = Vec::new();
    list.dump_to(&mut dump)?;
    print!("{}", String::from_utf8_lossy(&dump));

    println!("size: {}", list.len());
    print!("{}", list);
    Ok(())
}
