use anyhow::Result;

/// One process as reported by the platform process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub ppid: u32,
    /// Path (or name) of the executable, as the OS reports it
    pub command: String,
    /// Remaining command line arguments, joined by single spaces
    pub args: String,
    /// Start time. Clock ticks since boot on Linux, seconds since the epoch elsewhere.
    pub start_time: Option<u64>,
}

/// Push-style process enumeration.
///
/// `for_each_process` calls `on_process` once per discovered process and
/// returns once the whole table has been walked. It fails only when the table
/// itself cannot be read.
pub trait ProcessSource {
    fn for_each_process(&self, on_process: &mut dyn FnMut(ProcessRecord)) -> Result<()>;
}

/// Run one enumeration and buffer everything it reports.
pub fn collect_processes<S: ProcessSource + ?Sized>(source: &S) -> Result<Vec<ProcessRecord>> {
    let mut records = Vec::new();
    source.for_each_process(&mut |record| records.push(record))?;
    log::debug!("enumerated {} processes", records.len());
    Ok(records)
}

/// The running system's process table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcesses;

#[cfg(target_os = "linux")]
impl ProcessSource for SystemProcesses {
    fn for_each_process(&self, on_process: &mut dyn FnMut(ProcessRecord)) -> Result<()> {
        use anyhow::Context as _;

        let processes =
            procfs::process::all_processes().context("Could not read the process table")?;

        for process in processes {
            // Processes may exit or deny access between listing and reading
            let process = match process {
                Ok(p) => p,
                Err(err) => {
                    log::trace!("skipping unreadable process: {err}");
                    continue;
                }
            };
            match read_linux_process(&process) {
                Ok(record) => on_process(record),
                Err(err) => log::trace!("skipping pid {}: {err}", process.pid),
            }
        }

        Ok(())
    }
}

#[cfg(target_os = "linux")]
fn read_linux_process(process: &procfs::process::Process) -> procfs::ProcResult<ProcessRecord> {
    let stat = process.stat()?;
    let mut cmdline = process.cmdline()?.into_iter();

    let command = match cmdline.next() {
        Some(cmd) if !cmd.is_empty() => cmd,
        // Kernel threads and zombies have no command line
        _ => process
            .exe()
            .map(|exe| exe.to_string_lossy().into_owned())
            .unwrap_or_else(|_| stat.comm.clone()),
    };

    Ok(ProcessRecord {
        pid: process.pid as u32,
        ppid: stat.ppid as u32,
        command,
        args: cmdline.collect::<Vec<String>>().join(" "),
        start_time: Some(stat.starttime),
    })
}

#[cfg(not(target_os = "linux"))]
impl ProcessSource for SystemProcesses {
    fn for_each_process(&self, on_process: &mut dyn FnMut(ProcessRecord)) -> Result<()> {
        use sysinfo::System;

        let mut sys = System::new();
        sys.refresh_processes(sysinfo::ProcessesToUpdate::All, true);

        for (pid, process) in sys.processes() {
            let cmd = process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect::<Vec<String>>();

            let command = process
                .exe()
                .map(|exe| exe.to_string_lossy().into_owned())
                .or_else(|| cmd.first().cloned())
                .unwrap_or_else(|| process.name().to_string_lossy().into_owned());

            on_process(ProcessRecord {
                pid: pid.as_u32(),
                ppid: process.parent().map(|p| p.as_u32()).unwrap_or(0),
                command,
                args: cmd.get(1..).unwrap_or_default().join(" "),
                start_time: Some(process.start_time()),
            });
        }

        Ok(())
    }
}
