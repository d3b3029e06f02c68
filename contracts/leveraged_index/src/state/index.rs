use soroban_sdk::{contracttype, vec, Address, Env, Vec};

use leverset::constants::WAD;

/// Module controlling an external position.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PositionModule {
    Leverage,
}

/// Debt owed through `module`, as a per share magnitude.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalPosition {
    pub module: PositionModule,
    pub debt_virtual_unit: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Component {
    pub asset: Address,
    /// Held outright (supplied to the lending pool or idle in the index)
    pub default_virtual_unit: i128,
    pub external_positions: Vec<ExternalPosition>,
}

impl Component {
    pub fn new(env: &Env, asset: Address) -> Self {
        Component {
            asset,
            default_virtual_unit: 0,
            external_positions: Vec::new(env),
        }
    }

    pub fn external_position(&self, module: PositionModule) -> Option<ExternalPosition> {
        self.external_positions
            .iter()
            .find(|position| position.module == module)
    }

    pub fn set_external_virtual_unit(&mut self, module: PositionModule, virtual_unit: i128) {
        let position = ExternalPosition {
            module,
            debt_virtual_unit: virtual_unit,
        };
        match self
            .external_positions
            .iter()
            .position(|existing| existing.module == module)
        {
            Some(i) => self.external_positions.set(i as u32, position),
            None => self.external_positions.push_back(position),
        }
    }
}

/// Aggregate state of the index. Units are stored as virtual units; the real
/// unit of a component is `virtual * position_multiplier / WAD`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexState {
    pub total_supply: i128,
    pub position_multiplier: i128,
    pub components: Vec<Component>,
}

impl IndexState {
    /// One unit of collateral per share, nothing issued yet.
    pub fn new(env: &Env, collateral_asset: Address) -> Self {
        let mut collateral = Component::new(env, collateral_asset);
        collateral.default_virtual_unit = WAD;

        IndexState {
            total_supply: 0,
            position_multiplier: WAD,
            components: vec![env, collateral],
        }
    }

    pub fn component(&self, asset: &Address) -> Option<Component> {
        self.components
            .iter()
            .find(|component| component.asset == *asset)
    }

    pub fn save_component(&mut self, component: Component) {
        match self
            .components
            .iter()
            .position(|existing| existing.asset == component.asset)
        {
            Some(i) => self.components.set(i as u32, component),
            None => self.components.push_back(component),
        }
    }
}
