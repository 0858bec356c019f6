use prometheus::{IntGauge, Opts, Registry};

use crate::nfs::{Nfs3OpCounts, Nfs3Procedure};

/// Leading components of every gauge name.
pub const NAMESPACE: &str = "nfs";
pub const SUBSYSTEM: &str = "io";

/// Constant label carrying the host identifier on every gauge.
pub const HOST_LABEL: &str = "host";

/// Builds the published name of the gauge for `procedure`, e.g. `web01.nfs.io.getattr`.
///
/// In the registry the gauge is `nfs_io_<operation>` with a `host` label; the publisher joins
/// both back into this name.
pub fn metric_name(host: &str, procedure: Nfs3Procedure) -> String {
    format!("{host}.{NAMESPACE}.{SUBSYSTEM}.{procedure}")
}

/// One gauge per NFSv3 operation, holding the last observed cumulative call count.
#[derive(Debug)]
pub struct IoGaugeStore {
    /// Indexed like [`Nfs3Procedure::ALL`].
    gauges: Vec<IntGauge>,
}

impl IoGaugeStore {
    /// Creates a gauge for every operation in [`Nfs3Procedure::ALL`] and registers it with
    /// `registry`.
    ///
    /// Meant to be called once at startup.
    ///
    /// # Errors
    ///
    /// Returns [`prometheus::Error::AlreadyReg`] if the gauges of `host` are already registered.
    pub fn initialize(registry: &Registry, host: &str) -> prometheus::Result<Self> {
        let mut gauges = Vec::with_capacity(Nfs3Procedure::ALL.len());
        for procedure in Nfs3Procedure::ALL {
            let opts = Opts::new(
                procedure.name(),
                format!("Cumulative NFSv3 {procedure} calls since boot"),
            )
            .namespace(NAMESPACE)
            .subsystem(SUBSYSTEM)
            .const_label(HOST_LABEL, host);
            let gauge = IntGauge::with_opts(opts)?;
            registry.register(Box::new(gauge.clone()))?;
            gauges.push(gauge);
        }
        log::debug!("Registered {} NFS I/O gauges for host `{host}`", gauges.len());

        Ok(Self { gauges })
    }

    /// Sets every gauge to the matching counter in `counts`.
    ///
    /// Operations missing from `counts` keep their previous value.
    pub fn update(&self, counts: &Nfs3OpCounts) {
        for (procedure, gauge) in Nfs3Procedure::ALL.iter().zip(&self.gauges) {
            if let Some(value) = counts.get(*procedure) {
                gauge.set(i64::try_from(value).unwrap_or(i64::MAX));
            }
        }
    }

    /// Returns the current value of the gauge for `procedure`.
    pub fn get(&self, procedure: Nfs3Procedure) -> i64 {
        self.gauges[procedure as usize].get()
    }

    /// Iterates over all gauges in record order.
    pub fn iter(&self) -> impl Iterator<Item = (Nfs3Procedure, i64)> + '_ {
        Nfs3Procedure::ALL
            .iter()
            .zip(&self.gauges)
            .map(|(procedure, gauge)| (*procedure, gauge.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential_counts() -> Nfs3OpCounts {
        let data = "proc3 22 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21\n";
        Nfs3OpCounts::from_reader(&mut data.as_bytes())
            .unwrap()
            .unwrap()
    }

    fn registered_names(registry: &Registry) -> Vec<String> {
        registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_owned())
            .collect()
    }

    #[test]
    fn test_initialize_registers_every_operation() {
        let registry = Registry::new();
        let store = IoGaugeStore::initialize(&registry, "web01").unwrap();

        let names = registered_names(&registry);
        assert_eq!(names.len(), 21);
        assert!(names.contains(&"nfs_io_getattr".to_owned()));
        assert!(names.contains(&"nfs_io_readdirplus".to_owned()));
        assert!(names.contains(&"nfs_io_commit".to_owned()));
        assert_eq!(store.iter().count(), 21);

        let families = registry.gather();
        let label = &families[0].get_metric()[0].get_label()[0];
        assert_eq!(label.get_name(), HOST_LABEL);
        assert_eq!(label.get_value(), "web01");
    }

    #[test]
    fn test_initialize_twice_on_same_registry_fails() {
        let registry = Registry::new();
        IoGaugeStore::initialize(&registry, "web01").unwrap();
        let err = IoGaugeStore::initialize(&registry, "web01").unwrap_err();
        assert!(matches!(err, prometheus::Error::AlreadyReg));
    }

    #[test]
    fn test_gauges_start_at_zero() {
        let registry = Registry::new();
        let store = IoGaugeStore::initialize(&registry, "web01").unwrap();
        assert!(store.iter().all(|(_, value)| value == 0));
    }

    #[test]
    fn test_update_maps_each_counter_to_its_gauge() {
        let registry = Registry::new();
        let store = IoGaugeStore::initialize(&registry, "web01").unwrap();
        store.update(&sequential_counts());

        for procedure in Nfs3Procedure::ALL {
            assert_eq!(store.get(procedure), procedure.position() as i64, "{procedure}");
        }
    }

    #[test]
    fn test_update_replaces_previous_values() {
        let registry = Registry::new();
        let store = IoGaugeStore::initialize(&registry, "web01").unwrap();
        store.update(&sequential_counts());

        let later = Nfs3OpCounts {
            read: 500,
            ..Nfs3OpCounts::default()
        };
        store.update(&later);
        assert_eq!(store.get(Nfs3Procedure::Read), 500);
        assert_eq!(store.get(Nfs3Procedure::Getattr), 0);
        assert_eq!(store.get(Nfs3Procedure::Commit), 21);
    }

    #[test]
    fn test_update_saturates_oversized_counters() {
        let registry = Registry::new();
        let store = IoGaugeStore::initialize(&registry, "web01").unwrap();
        let counts = Nfs3OpCounts {
            write: u64::MAX,
            ..Nfs3OpCounts::default()
        };
        store.update(&counts);
        assert_eq!(store.get(Nfs3Procedure::Write), i64::MAX);
    }

    #[test]
    fn test_metric_name() {
        assert_eq!(
            metric_name("db-2.example", Nfs3Procedure::Fsstat),
            "db-2.example.nfs.io.fsstat"
        );
    }
}
