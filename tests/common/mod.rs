#![allow(dead_code)]

use yangcond::{DataNode, SchemaTree, load_schema};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Installs a test logger once; honours `RUST_LOG`.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A small interfaces/system model exercising lists, enumerations, features and
/// every condition kind.
pub const SCHEMA_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MODULE xmlns="http://example.com/ns/schema" model="example-system" namespace="urn:example:system" prefix="sys">
  <NODE name="interfaces">
    <NODE name="interface">
      <NODE name="*">
        <NODE name="name" mode="rw"/>
        <NODE name="type" mode="rw" idref_prefix="ianaift" idref_self="sys"/>
        <NODE name="enabled" mode="rw" default="true">
          <VALUE name="true" value="1"/>
          <VALUE name="false" value="0"/>
        </NODE>
        <NODE name="mtu" mode="rw" must="../type = 'ianaift:ethernetCsmacd'"/>
        <NODE name="address">
          <NODE name="*" mode="rw"/>
        </NODE>
      </NODE>
    </NODE>
  </NODE>
  <NODE name="system" features="ntp dns-client">
    <NODE name="hostname" mode="rw"/>
    <NODE name="ntp" if-feature="ntp">
      <NODE name="enabled" mode="rw">
        <VALUE name="true" value="1"/>
        <VALUE name="false" value="0"/>
      </NODE>
      <NODE name="server" mode="rw" when="../enabled = 'true'"/>
    </NODE>
    <NODE name="radius" if-feature="radius">
      <NODE name="server" mode="rw"/>
    </NODE>
  </NODE>
</MODULE>"#;

pub fn schema() -> SchemaTree {
    load_schema(SCHEMA_XML).unwrap()
}

/// `/interfaces/interface/eth0` with a few leaves and two addresses.
pub fn interfaces_data() -> DataNode {
    let eth0 = DataNode::new("eth0")
        .with_child(DataNode::leaf("name", "eth0"))
        .with_child(DataNode::leaf("type", "ethernetCsmacd"))
        .with_child(DataNode::leaf("enabled", "1"))
        .with_child(DataNode::leaf("mtu", "1500"))
        .with_child(
            DataNode::new("address")
                .with_child(DataNode::leaf("10.0.0.1", "10.0.0.1"))
                .with_child(DataNode::leaf("10.0.0.2", "10.0.0.2")),
        );
    DataNode::new("/").with_child(
        DataNode::new("interfaces").with_child(DataNode::new("interface").with_child(eth0)),
    )
}

/// `/system/ntp` with `enabled` stored as its wire value.
pub fn ntp_data(enabled: &str) -> DataNode {
    DataNode::new("/").with_child(
        DataNode::new("system")
            .with_child(DataNode::leaf("hostname", "core1"))
            .with_child(
                DataNode::new("ntp")
                    .with_child(DataNode::leaf("enabled", enabled))
                    .with_child(DataNode::leaf("server", "pool.ntp.org")),
            ),
    )
}
