//! Passive look at the local network from the target's point of view.
//!
//! Lists the interfaces this machine could reach the target through, and tells
//! whether the target sits inside one of their networks or lies behind a route.
//! Nothing is sent to the target itself.

use std::fmt;
use std::net::IpAddr;

use async_trait::async_trait;
use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use tokio::net::UdpSocket;

use probr_common::network::target::Target;
use probr_common::{info, success, warn};

use super::{Reconnaissance, resolve_addrs};

#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};
#[cfg(not(target_os = "linux"))]
use other_impl::{is_physical, is_wireless};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    IsLoopback,
    /// No address is configured, so nothing can be routed through it.
    NoAddress,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InterfaceKind {
    Wired,
    Wireless,
    Virtual,
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterfaceKind::Wired => "wired",
            InterfaceKind::Wireless => "wireless",
            InterfaceKind::Virtual => "virtual",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalNetworkRecon;

#[async_trait]
impl Reconnaissance for LocalNetworkRecon {
    fn name(&self) -> &'static str {
        "local network"
    }

    async fn run(&self, target: &Target) -> anyhow::Result<()> {
        let interfaces: Vec<NetworkInterface> = datalink::interfaces()
            .into_iter()
            .filter(|iface| is_viable_interface(iface).is_ok())
            .collect();

        if interfaces.is_empty() {
            anyhow::bail!("no usable network interface on this machine");
        }

        info!("{} usable network interface(s)", interfaces.len());
        for iface in &interfaces {
            info!(
                "{} ({}): {}",
                iface.name,
                interface_kind(iface, is_physical, is_wireless),
                networks_of(iface)
            );
        }

        for addr in resolve_addrs(target).await? {
            if let Some(idx) = find_local_index(&interfaces, addr) {
                success!("{addr} is inside the local network of {}", interfaces[idx].name);
                continue;
            }

            match resolve_route_source_ip(addr).await {
                Some(source) => {
                    let via = find_owner(&interfaces, source)
                        .map(|iface| iface.name.as_str())
                        .unwrap_or("an unlisted interface");
                    info!("{addr} is routed, leaving from {source} on {via}");
                }
                None => warn!("No route to {addr}"),
            }
        }

        Ok(())
    }
}

fn is_viable_interface(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if interface.ips.is_empty() {
        return Err(ViabilityError::NoAddress);
    }
    Ok(())
}

fn interface_kind(
    interface: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
    is_wireless: impl Fn(&NetworkInterface) -> bool,
) -> InterfaceKind {
    if is_wireless(interface) {
        InterfaceKind::Wireless
    } else if is_physical(interface) && !interface.is_point_to_point() {
        InterfaceKind::Wired
    } else {
        InterfaceKind::Virtual
    }
}

fn networks_of(interface: &NetworkInterface) -> String {
    interface
        .ips
        .iter()
        .map(IpNetwork::to_string)
        .collect::<Vec<String>>()
        .join(", ")
}

fn find_local_index(interfaces: &[NetworkInterface], target: IpAddr) -> Option<usize> {
    interfaces.iter().position(|iface| {
        iface.ips.iter().any(|ip_net| match (target, ip_net.ip()) {
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_)) => {
                ip_net.contains(target)
            }
            _ => false,
        })
    })
}

fn find_owner(interfaces: &[NetworkInterface], addr: IpAddr) -> Option<&NetworkInterface> {
    interfaces
        .iter()
        .find(|iface| iface.ips.iter().any(|ip_net| ip_net.ip() == addr))
}

/// Source address the kernel would pick to reach `target`.
///
/// Connecting a UDP socket sends nothing; it only runs the route lookup.
async fn resolve_route_source_ip(target: IpAddr) -> Option<IpAddr> {
    let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
    let socket = UdpSocket::bind(bind_addr).await.ok()?;
    socket.connect((target, 53)).await.ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }
}

#[cfg(not(target_os = "linux"))]
mod other_impl {
    use super::*;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        interface.mac.is_some() && interface.is_broadcast()
    }

    pub fn is_wireless(_interface: &NetworkInterface) -> bool {
        false
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
