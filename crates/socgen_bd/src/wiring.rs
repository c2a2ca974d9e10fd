//! Point-to-point connections from a cell's port and interface maps.

use std::fmt;

use socgen_config::BdCell;

/// The far end of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A pin of another cell, written `cell/pin`.
    Pin(String),
    /// A top-level block design port.
    Port(String),
}

impl Endpoint {
    /// A target containing a hierarchy separator names another cell's pin;
    /// a bare name is a top-level port.
    pub fn classify(target: &str) -> Self {
        if target.contains('/') {
            Endpoint::Pin(target.to_string())
        } else {
            Endpoint::Port(target.to_string())
        }
    }

    fn net_lookup(&self) -> String {
        match self {
            Endpoint::Pin(name) => format!("[get_bd_pins {name}]"),
            Endpoint::Port(name) => format!("[get_bd_ports {name}]"),
        }
    }

    fn interface_lookup(&self) -> String {
        match self {
            Endpoint::Pin(name) => format!("[get_bd_intf_pins {name}]"),
            Endpoint::Port(name) => format!("[get_bd_intf_ports {name}]"),
        }
    }
}

/// One connection statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// A signal net between `target` and `cell/pin`.
    Net {
        /// Owning cell.
        cell: String,
        /// Local pin name.
        pin: String,
        /// Far end.
        target: Endpoint,
    },
    /// An interface net between `target` and `cell/interface`.
    Interface {
        /// Owning cell.
        cell: String,
        /// Local interface name.
        interface: String,
        /// Far end.
        target: Endpoint,
    },
}

impl Connection {
    /// The synthesized net name, unique because cell names are.
    pub fn net_name(&self) -> String {
        match self {
            Connection::Net { cell, pin, .. } => format!("{cell}_{pin}"),
            Connection::Interface { cell, interface, .. } => format!("{cell}_{interface}"),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::Net { cell, pin, target } => write!(
                f,
                "connect_bd_net -net {} {} [get_bd_pins {cell}/{pin}]",
                self.net_name(),
                target.net_lookup()
            ),
            Connection::Interface {
                cell,
                interface,
                target,
            } => write!(
                f,
                "connect_bd_intf_net -intf_net {} {} [get_bd_intf_pins {cell}/{interface}]",
                self.net_name(),
                target.interface_lookup()
            ),
        }
    }
}

/// All connections of a cell: ports first, then interfaces, each in declaration order.
pub fn connections(cell: &BdCell) -> Vec<Connection> {
    let nets = cell.ports.iter().map(|(pin, target)| Connection::Net {
        cell: cell.module_name.clone(),
        pin: pin.clone(),
        target: Endpoint::classify(target),
    });
    let interfaces = cell
        .interfaces
        .iter()
        .map(|(interface, target)| Connection::Interface {
            cell: cell.module_name.clone(),
            interface: interface.clone(),
            target: Endpoint::classify(target),
        });
    nets.chain(interfaces).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpio() -> BdCell {
        BdCell::new("gpio", "xilinx.com:ip:axi_gpio:2.0".parse().unwrap())
    }

    #[test]
    fn classify_endpoint() {
        assert_eq!(Endpoint::classify("clk_wiz/clk_out1"), Endpoint::Pin("clk_wiz/clk_out1".into()));
        assert_eq!(Endpoint::classify("sys_clk"), Endpoint::Port("sys_clk".into()));
    }

    #[test]
    fn pin_to_pin() {
        let cell = gpio().with_port("s_axi_aclk", "clk_wiz/clk_out1");
        let conns = connections(&cell);
        assert_eq!(
            conns[0].to_string(),
            "connect_bd_net -net gpio_s_axi_aclk [get_bd_pins clk_wiz/clk_out1] [get_bd_pins gpio/s_axi_aclk]"
        );
    }

    #[test]
    fn port_to_pin() {
        let cell = gpio().with_port("s_axi_aresetn", "reset_n");
        assert_eq!(
            connections(&cell)[0].to_string(),
            "connect_bd_net -net gpio_s_axi_aresetn [get_bd_ports reset_n] [get_bd_pins gpio/s_axi_aresetn]"
        );
    }

    #[test]
    fn interfaces_after_ports() {
        let cell = gpio()
            .with_interface("GPIO", "leds")
            .with_port("s_axi_aclk", "sys_clk")
            .with_interface("S_AXI", "periph/M00_AXI");
        let conns = connections(&cell);
        assert_eq!(conns.len(), 3);
        assert!(matches!(conns[0], Connection::Net { .. }));
        assert_eq!(
            conns[1].to_string(),
            "connect_bd_intf_net -intf_net gpio_GPIO [get_bd_intf_ports leds] [get_bd_intf_pins gpio/GPIO]"
        );
        assert_eq!(
            conns[2].to_string(),
            "connect_bd_intf_net -intf_net gpio_S_AXI [get_bd_intf_pins periph/M00_AXI] [get_bd_intf_pins gpio/S_AXI]"
        );
    }

    #[test]
    fn no_maps_no_connections() {
        assert!(connections(&gpio()).is_empty());
    }
}
