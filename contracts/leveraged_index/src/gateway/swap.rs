use leverset::{
    constants::SWAP_DEADLINE_WINDOW,
    error::{ErrorCode, LeverResult},
    interfaces::swap_router::SwapRouterClient,
    math::decimals::{from_wad_ceil, from_wad_floor, to_wad},
    types::SwapVenue,
};
use soroban_sdk::{log, Address, Env, Vec};

use crate::{gateway::token, storage::get_swap_venue};

pub struct SwapGateway<'a> {
    env: &'a Env,
    router: SwapRouterClient<'a>,
    holder: Address,
}

impl<'a> SwapGateway<'a> {
    /// Resolves `venue` through the index's venue registry.
    pub fn new(env: &'a Env, venue: SwapVenue) -> LeverResult<Self> {
        let router = get_swap_venue(env, venue).ok_or_else(|| {
            log!(env, "Swap Gateway: venue has no router registered");
            ErrorCode::SwapVenueNotFound
        })?;

        Ok(SwapGateway {
            env,
            router: SwapRouterClient::new(env, &router),
            holder: env.current_contract_address(),
        })
    }

    /// `[from, hops.., to]`
    pub fn path(env: &Env, from: &Address, hops: &Vec<Address>, to: &Address) -> Vec<Address> {
        let mut path = Vec::new(env);
        path.push_back(from.clone());
        path.append(hops);
        path.push_back(to.clone());
        path
    }

    fn deadline(&self) -> u64 {
        self.env.ledger().timestamp() + SWAP_DEADLINE_WINDOW
    }

    pub fn quote_out(&self, path: &Vec<Address>, amount_in: i128) -> LeverResult<i128> {
        let (asset_in, asset_out) = ends(path);
        let native_in = from_wad_floor(self.env, amount_in, token::decimals(self.env, &asset_in))?;
        if native_in == 0 {
            return Ok(0);
        }

        let native_out = self.router.quote_out(path, &native_in);
        to_wad(self.env, native_out, token::decimals(self.env, &asset_out))
    }

    /// Sells `amount_in` held by the index. Returns the WAD amount received.
    pub fn swap_exact_in(
        &self,
        path: &Vec<Address>,
        amount_in: i128,
        min_out: i128,
    ) -> LeverResult<i128> {
        let (asset_in, asset_out) = ends(path);
        let decimals_out = token::decimals(self.env, &asset_out);
        let native_in = from_wad_floor(self.env, amount_in, token::decimals(self.env, &asset_in))?;
        if native_in == 0 {
            return Ok(0);
        }
        let native_min_out = from_wad_ceil(self.env, min_out, decimals_out)?;

        token::approve(self.env, &asset_in, &self.router.address, native_in);
        let native_out = self.router.swap_exact_in(
            path,
            &native_in,
            &native_min_out,
            &self.holder,
            &self.deadline(),
        );

        to_wad(self.env, native_out, decimals_out)
    }

    /// Buys at least `amount_out`, spending at most `max_in`. Returns the WAD
    /// amounts `(spent, bought)`, or `SlippageExceeded` if the venue needs more.
    pub fn swap_for_exact_out(
        &self,
        path: &Vec<Address>,
        amount_out: i128,
        max_in: i128,
    ) -> LeverResult<(i128, i128)> {
        let (asset_in, asset_out) = ends(path);
        let decimals_in = token::decimals(self.env, &asset_in);
        let decimals_out = token::decimals(self.env, &asset_out);
        let native_out = from_wad_ceil(self.env, amount_out, decimals_out)?;
        let native_max_in = from_wad_floor(self.env, max_in, decimals_in)?;
        if native_out == 0 {
            return Ok((0, 0));
        }

        token::approve(self.env, &asset_in, &self.router.address, native_max_in);
        let result = self.router.try_swap_for_exact_out(
            path,
            &native_out,
            &native_max_in,
            &self.holder,
            &self.deadline(),
        );
        token::revoke(self.env, &asset_in, &self.router.address);

        match result {
            Ok(Ok(native_in)) => Ok((
                to_wad(self.env, native_in, decimals_in)?,
                to_wad(self.env, native_out, decimals_out)?,
            )),
            _ => {
                log!(self.env, "Swap Gateway: exact output swap rejected by venue");
                Err(ErrorCode::SlippageExceeded)
            }
        }
    }
}

fn ends(path: &Vec<Address>) -> (Address, Address) {
    (path.get_unchecked(0), path.get_unchecked(path.len() - 1))
}
