//! TCP/IP command handlers.

use serde::Serialize;

use tlnet_api::Session;
use tlnet_api::admin::{Ipv4Info, Ipv6Info, TcpIp};

use crate::cli::{GlobalOpts, IpArgs, IpCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct Addressing {
    ipv4: Ipv4Info,
    ipv6: Ipv6Info,
}

fn detail(a: &Addressing, color: bool) -> String {
    let v6_address = match (&a.ipv6.address, a.ipv6.prefix_length) {
        (Some(addr), Some(prefix)) => format!("{addr}/{prefix}"),
        (Some(addr), None) => addr.clone(),
        (None, _) => "-".into(),
    };
    output::render_fields(
        &[
            ("IPv4 DHCP", output::or_dash(a.ipv4.dhcp.as_deref())),
            ("IPv4 address", output::or_dash(a.ipv4.address.as_deref())),
            ("Subnet mask", output::or_dash(a.ipv4.subnet_mask.as_deref())),
            ("Gateway", output::or_dash(a.ipv4.gateway.as_deref())),
            ("DNS", output::or_dash(a.ipv4.dns.as_deref())),
            ("Domain", output::or_dash(a.ipv4.search_domain.as_deref())),
            ("IPv6 DHCP", output::or_dash(a.ipv6.dhcp.as_deref())),
            ("IPv6 address", v6_address),
            ("IPv6 gateway", output::or_dash(a.ipv6.gateway.as_deref())),
            ("IPv6 DNS", output::or_dash(a.ipv6.dns.as_deref())),
        ],
        color,
    )
}

pub async fn handle(session: &Session, args: IpArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let tcp_ip = TcpIp::new(session);
    match args.command {
        IpCommand::Show => {
            let addressing = Addressing {
                ipv4: tcp_ip.ipv4_info().await?,
                ipv6: tcp_ip.ipv6_info().await?,
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &addressing,
                |a| detail(a, color),
                |a| a.ipv4.address.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
        }
        IpCommand::Dhcp4 { state } => {
            tcp_ip.set_ipv4_dhcp(state.enabled()).await?;
            output::print_done(global, &format!("IPv4 DHCP {}", util::state_word(state.enabled())));
        }
        IpCommand::Dhcp6 { state } => {
            tcp_ip.set_ipv6_dhcp(state.enabled()).await?;
            output::print_done(global, &format!("IPv6 DHCP {}", util::state_word(state.enabled())));
        }
        IpCommand::Autoneg { state } => {
            tcp_ip.set_autonegotiation(state.enabled()).await?;
            output::print_done(
                global,
                &format!("Autonegotiation {}", util::state_word(state.enabled())),
            );
        }
    }
    Ok(())
}
