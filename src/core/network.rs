use serde::Serialize;

pub const VPC_CIDR: &str = "10.0.0.0/16";
pub const SUBNET_CIDR_MASK: u8 = 24;
pub const MAX_AVAILABILITY_ZONES: usize = 3;
pub const NAT_GATEWAYS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AvailabilityZone {
    /// Resolved by CloudFormation from the stack's region (`Fn::GetAZs`).
    Indexed(usize),
    Named(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubnetType {
    Public,
    PrivateWithEgress,
}

impl SubnetType {
    pub fn group_name(&self) -> &'static str {
        match self {
            SubnetType::Public => "Public",
            SubnetType::PrivateWithEgress => "Private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subnet {
    /// 1-based position within its group, used in logical ids.
    pub index: usize,
    pub subnet_type: SubnetType,
    pub availability_zone: AvailabilityZone,
    pub cidr_block: String,
}

impl Subnet {
    pub fn logical_prefix(&self) -> String {
        format!("ApiVpc{}Subnet{}", self.subnet_type.group_name(), self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkTopology {
    pub cidr_block: String,
    pub availability_zones: Vec<AvailabilityZone>,
    pub subnets: Vec<Subnet>,
    pub nat_gateways: usize,
}

impl NetworkTopology {
    /// Builds the VPC layout. `max_azs` above the cap is clamped; explicit zone
    /// names, when given, take precedence over `Fn::GetAZs` positions.
    pub fn new(max_azs: usize, explicit_zones: Option<&[String]>) -> Self {
        let zone_count = max_azs.clamp(1, MAX_AVAILABILITY_ZONES);
        if max_azs > MAX_AVAILABILITY_ZONES {
            tracing::warn!(
                "Requested {} availability zones, capping at {}",
                max_azs,
                MAX_AVAILABILITY_ZONES
            );
        }

        let availability_zones: Vec<AvailabilityZone> = match explicit_zones {
            Some(names) if !names.is_empty() => names
                .iter()
                .take(zone_count)
                .map(|n| AvailabilityZone::Named(n.clone()))
                .collect(),
            _ => (0..zone_count).map(AvailabilityZone::Indexed).collect(),
        };

        // 先配置所有 public 子網，再配置 private 子網
        let mut subnets = Vec::with_capacity(availability_zones.len() * 2);
        let mut third_octet = 0usize;
        for subnet_type in [SubnetType::Public, SubnetType::PrivateWithEgress] {
            for (i, az) in availability_zones.iter().enumerate() {
                subnets.push(Subnet {
                    index: i + 1,
                    subnet_type,
                    availability_zone: az.clone(),
                    cidr_block: format!("10.0.{}.0/{}", third_octet, SUBNET_CIDR_MASK),
                });
                third_octet += 1;
            }
        }

        Self {
            cidr_block: VPC_CIDR.to_string(),
            availability_zones,
            subnets,
            nat_gateways: NAT_GATEWAYS,
        }
    }

    pub fn zone_count(&self) -> usize {
        self.availability_zones.len()
    }

    pub fn subnets_of(&self, subnet_type: SubnetType) -> impl Iterator<Item = &Subnet> {
        self.subnets
            .iter()
            .filter(move |s| s.subnet_type == subnet_type)
    }

    pub fn public_subnets(&self) -> impl Iterator<Item = &Subnet> {
        self.subnets_of(SubnetType::Public)
    }

    pub fn private_subnets(&self) -> impl Iterator<Item = &Subnet> {
        self.subnets_of(SubnetType::PrivateWithEgress)
    }

    /// The single shared NAT gateway lives in the first public subnet.
    pub fn nat_subnet(&self) -> Option<&Subnet> {
        self.public_subnets().next()
    }
}
