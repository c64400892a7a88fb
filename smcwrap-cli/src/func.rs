use smcwrap_lib::{
    SMCWrapper, SmcError, SmcStatus,
    driver::SmcDriver,
    value::{parse_hex, parse_key},
};
use std::io::Write;

use crate::command::Commands;

pub fn run<D: SmcDriver>(
    smc: &mut SMCWrapper<D>,
    command: Commands,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::List => list(smc, out),
        Commands::Read { key, number } => read(smc, &key, number, out),
        Commands::Write { key, value } => write(smc, &key, &value),
        Commands::Set { key, value } => set(smc, &key, &value),
        Commands::Dump { json } => dump(smc, json, out),
        Commands::Info => info(smc, out),
    }
}

pub fn list<D: SmcDriver>(smc: &mut SMCWrapper<D>, out: &mut impl Write) -> anyhow::Result<()> {
    for v in smc.values()? {
        match v {
            Ok(v) => writeln!(out, "{v}")?,
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}

pub fn read<D: SmcDriver>(
    smc: &mut SMCWrapper<D>,
    key: &str,
    number: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let key = parse_key(key)?;
    if number {
        writeln!(out, "{}", smc.read_key_as_number(&key)?)?;
    } else {
        writeln!(out, "{}", smc.read_key(&key)?)?;
    }
    Ok(())
}

pub fn write<D: SmcDriver>(smc: &mut SMCWrapper<D>, key: &str, value: &str) -> anyhow::Result<()> {
    let key = parse_key(key)?;
    let bytes = parse_hex(value)?;
    smc.write_key(&key, &bytes)?;
    Ok(())
}

pub fn set<D: SmcDriver>(smc: &mut SMCWrapper<D>, key: &str, value: &str) -> anyhow::Result<()> {
    let key = parse_key(key)?;
    smc.write_str(&key, value)?;
    Ok(())
}

pub fn dump<D: SmcDriver>(
    smc: &mut SMCWrapper<D>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let dump = smc.dump()?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &dump)?;
        writeln!(out)?;
    } else {
        for (key, data_type, value) in dump.iter() {
            writeln!(out, "{key}  [{data_type}]  {value}")?;
        }
    }
    Ok(())
}

pub fn info<D: SmcDriver>(smc: &mut SMCWrapper<D>, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "keys: {}", smc.key_count()?)?;
    // not every SMC answers these two commands
    match smc.read_version() {
        Ok(version) => writeln!(out, "version: {version}")?,
        Err(e) => writeln!(out, "version: unavailable ({e})")?,
    }
    match smc.read_plimit() {
        Ok(limits) => writeln!(
            out,
            "power limits: cpu {} gpu {} mem {}",
            limits.cpu, limits.gpu, limits.mem
        )?,
        Err(e) => writeln!(out, "power limits: unavailable ({e})")?,
    }
    Ok(())
}

/// Exit status of a failed command: the [`SmcStatus`] of the SMC error
/// behind it, [`SmcStatus::InvalidArgument`] for anything else.
pub fn exit_status(err: &anyhow::Error) -> SmcStatus {
    err.downcast_ref::<SmcError>()
        .map_or(SmcStatus::InvalidArgument, SmcError::status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smcwrap_lib::{memory::MemoryDriver, structs::SmcVersion};

    fn smc() -> SMCWrapper<MemoryDriver> {
        SMCWrapper::new(
            MemoryDriver::new()
                .with_key(*b"TC0P", *b"sp78", &[0x2d, 0x80])
                .with_key(*b"F0Mn", *b"fpe2", &[0x0a, 0xf0])
                .with_key(*b"{FDS", *b"{fds", &[0; 4])
                .with_key(*b"LSOF", *b"{lso", &[0x01, 0x02])
                .with_version(SmcVersion {
                    major: 1,
                    minor: 7,
                    build: 5,
                    release: 0,
                }),
        )
    }

    fn output(
        f: impl FnOnce(&mut SMCWrapper<MemoryDriver>, &mut Vec<u8>) -> anyhow::Result<()>,
    ) -> String {
        let mut smc = smc();
        let mut out = Vec::new();
        f(&mut smc, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn read_prints_raw_view() {
        assert_eq!(
            output(|smc, out| read(smc, "TC0P", false, out)),
            "TC0P sp78 size: 2(bytes 2d 80) value: 45.50\n"
        );
        assert_eq!(output(|smc, out| read(smc, "TC0P", true, out)), "45.5\n");
    }

    #[test]
    fn read_rejects_bad_key() {
        let err = read(&mut smc(), "TC0", false, &mut Vec::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SmcError>(),
            Some(&SmcError::InvalidKey("TC0".into()))
        );
    }

    #[test]
    fn list_prints_every_key() {
        let text = output(|smc, out| list(smc, out));
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("{FDS {fds size: 4(bytes 00 00 00 00)"));
    }

    #[test]
    fn dump_text_and_json() {
        assert_eq!(
            output(|smc, out| dump(smc, false, out)),
            "F0Mn  [fpe2]  700.00\nLSOF  [{lso]  01 02\nTC0P  [sp78]  45.50\n"
        );

        let json: serde_json::Value =
            serde_json::from_str(&output(|smc, out| dump(smc, true, out))).unwrap();
        assert_eq!(json["values"]["TC0P"], "45.50");
        assert_eq!(json["types"]["F0Mn"], "fpe2");
        assert!(json["values"].get("{FDS").is_none());
    }

    #[test]
    fn write_and_set() {
        let mut smc = smc();
        write(&mut smc, "F0Mn", "1c20").unwrap();
        assert_eq!(smc.read_key_as_string(b"F0Mn").unwrap(), "1800.00");

        set(&mut smc, "F0Mn", "1200").unwrap();
        assert_eq!(smc.read_key_as_string(b"F0Mn").unwrap(), "1200.00");

        set(&mut smc, "LSOF", "0a ff").unwrap();
        assert_eq!(smc.read_key_as_string(b"LSOF").unwrap(), "0a ff");

        assert!(write(&mut smc, "F0Mn", "1c2").is_err());
        assert!(write(&mut smc, "F0Mn", "1c2000").is_err());
    }

    #[test]
    fn exit_status_of_failures() {
        let mut smc = smc();

        let err = write(&mut smc, "F0Mn", "zz").unwrap_err();
        assert_eq!(
            err.downcast_ref::<SmcError>(),
            Some(&SmcError::InvalidHex("zz".into()))
        );
        assert_eq!(exit_status(&err), SmcStatus::InvalidArgument);

        let err = write(&mut smc, "F0Mn", "1c2000").unwrap_err();
        assert_eq!(exit_status(&err), SmcStatus::DecodeFailed);

        let err = read(&mut smc, "TX9Z", false, &mut Vec::new()).unwrap_err();
        assert_eq!(exit_status(&err), SmcStatus::CallStructMethodFailed);

        let err = anyhow::Error::new(SmcError::NoSmcFound).context("opening the SMC");
        assert_eq!(exit_status(&err), SmcStatus::NoSmcFound);

        assert_eq!(
            exit_status(&anyhow::anyhow!("lock poisoned")),
            SmcStatus::InvalidArgument
        );

        smc.close();
        let err = info(&mut smc, &mut Vec::new()).unwrap_err();
        assert_eq!(exit_status(&err), SmcStatus::Closed);
    }

    #[test]
    fn info_summary() {
        let text = output(|smc, out| info(smc, out));
        assert!(text.starts_with("keys: 4\nversion: 1.7f5 (release 0)\n"));
        assert!(text.contains("power limits: cpu 0 gpu 0 mem 0"));
    }
}
