use std::io::Write;

use log::info;

use crate::{
    cache::{Cache, CacheStats},
    config::Config,
    cpu::Cpu,
    ram::Ram,
    Result,
};

#[derive(Debug)]
pub struct Outcome {
    pub ram: Ram,
    pub cpu: Cpu,
    pub stats: CacheStats,
}

/// Dirty lines are flushed before returning, so `ram` reflects every write.
pub fn simulate<W: Write>(config: &Config, out: &mut W) -> Result<Outcome> {
    let mut ram = Ram::new(config.ram_size)?;
    ram.load(config.start, &config.preload)?;
    let mut cpu = Cpu::new();

    let stats = {
        let mut cache = Cache::new(config.cache_size, config.line_size, &mut ram)?
            .report_misses(config.report_misses);
        cpu.run(&mut cache, out, config.start)?;
        cache.flush()?;
        cache.make_stats()
    };
    info!(
        "program done at pc {}: {} hits, {} misses, {} write backs",
        cpu.pc,
        stats.hits,
        stats.misses,
        stats.write_backs
    );

    Ok(Outcome { ram, cpu, stats })
}
